pub mod str;
pub mod url;
