//! HTML views.
//!
//! Pages are small enough to build with `format!`. Every interpolated value
//! goes through [`escape`] (text) or [`encode_segment`] (URL paths).

use filecms_core::naming::split_name;

const SITE_TITLE: &str = "File-based Content Management System";

/// Escape text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a single URL path segment.
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'(' | b')' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Wrap `body` in the site layout.
pub fn layout(title: &str, flash: Option<&str>, username: Option<&str>, body: &str) -> String {
    let flash = flash
        .map(|msg| format!("<p class=\"flash\">{}</p>\n", escape(msg)))
        .unwrap_or_default();

    let account = match username {
        Some(user) => format!(
            "<footer>\n<p>Signed in as {}.</p>\n\
             <form method=\"post\" action=\"/users/signout\">\
             <button type=\"submit\">Sign Out</button></form>\n</footer>\n",
            escape(user)
        ),
        None => String::new(),
    };

    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - {SITE_TITLE}</title>\n</head>\n<body>\n{flash}<main>\n{body}\n</main>\n\
         {account}</body>\n</html>\n",
        escape(title)
    )
}

/// Document listing.
pub fn index(files: &[String]) -> String {
    let mut items = String::new();
    for file in files {
        let href = encode_segment(file);
        let name = escape(file);
        items.push_str(&format!(
            "<li>\n<a href=\"/{href}\">{name}</a>\n\
             <a href=\"/{href}/edit\">Edit</a>\n\
             <form method=\"post\" action=\"/{href}/copy\"><button type=\"submit\">Copy</button></form>\n\
             <form method=\"post\" action=\"/{href}/delete\"><button type=\"submit\">Delete</button></form>\n\
             </li>\n"
        ));
    }

    format!(
        "<ul>\n{items}</ul>\n\
         <p><a href=\"/new\">New Document</a></p>\n\
         <p><a href=\"/upload\">Upload Image</a></p>"
    )
}

pub fn signin_form(username: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/users/signin\">\n\
         <label for=\"username\">Username:</label>\n\
         <input name=\"username\" id=\"username\" value=\"{}\">\n\
         <label for=\"password\">Password:</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\">\n\
         <button type=\"submit\">Sign In</button>\n\
         </form>\n\
         <p><a href=\"/users/signup\">Create an account</a></p>",
        escape(username)
    )
}

pub fn signup_form(username: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/users/signup\">\n\
         <label for=\"username\">Username:</label>\n\
         <input name=\"username\" id=\"username\" value=\"{}\">\n\
         <label for=\"password\">Password:</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\">\n\
         <button type=\"submit\">Sign Up</button>\n\
         </form>",
        escape(username)
    )
}

pub fn new_form(filename: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/new\">\n\
         <label for=\"filename\">Add a new document:</label>\n\
         <input name=\"filename\" id=\"filename\" value=\"{}\">\n\
         <button type=\"submit\">Create</button>\n\
         </form>",
        escape(filename)
    )
}

pub fn upload_form(url: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/upload/image\">\n\
         <label for=\"upload\">Image URL:</label>\n\
         <input name=\"upload\" id=\"upload\" value=\"{}\">\n\
         <button type=\"submit\">Upload</button>\n\
         </form>",
        escape(url)
    )
}

/// Edit form plus links to earlier versions.
///
/// The newline after `<textarea>` is dropped by browsers, which keeps a
/// leading newline in `content` intact.
pub fn edit_form(filename: &str, content: &str, versions: &[String]) -> String {
    let (stem, _) = split_name(filename);

    let history = if versions.is_empty() {
        "<p>No previous versions.</p>".to_string()
    } else {
        let folder = encode_segment(stem);
        let items: String = versions
            .iter()
            .map(|version| {
                format!(
                    "<li><a href=\"/{folder}/{}/view\">{}</a></li>\n",
                    encode_segment(version),
                    escape(version)
                )
            })
            .collect();
        format!("<ul>\n{items}</ul>")
    };

    format!(
        "<p>Edit content of '{}':</p>\n\
         <form method=\"post\" action=\"/{}\">\n\
         <textarea name=\"content\" rows=\"20\" cols=\"100\">\n{}</textarea>\n\
         <button type=\"submit\">Save Changes</button>\n\
         </form>\n\
         <h3>Versions</h3>\n{history}",
        escape(filename),
        encode_segment(filename),
        escape(content)
    )
}
