/// Decode trace and JSON tree command.
pub mod dump;
/// Tag name search command.
pub mod find;
/// Tag path lookup command.
pub mod get;
/// File-level information command.
pub mod info;
/// Tree rendering helpers shared by commands.
pub mod print;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
