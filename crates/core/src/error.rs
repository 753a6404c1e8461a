#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("A name with a .txt or .md extension is required.")]
    InvalidName,

    #[error("{name} does not exist.")]
    NotFound { name: String },

    #[error("Invalid image url. Please try again.")]
    InvalidImageUrl,

    #[error("Please enter a valid username. Usernames must not contain spaces or empty.")]
    InvalidUsername,

    #[error("Username is already in use.")]
    DuplicateUsername,

    #[error("Please enter a valid password.")]
    InvalidPassword,

    #[error("Credential file error: {0}")]
    Credentials(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] on the given name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
