//! Process exit codes, taken from BSD sysexits.h

/// Bad invocation: no command, or no listing given and none configured
pub const USAGE: i32 = 64;

/// Rejected parent selection or malformed category data
pub const DATAERR: i32 = 65;

/// Listing unreadable, or a referenced category id is not in it
pub const NOINPUT: i32 = 66;

/// Local I/O failed (working directory, writing output)
pub const IOERR: i32 = 74;

/// `catree.toml` or `CATREE_*` settings are invalid
pub const CONFIG: i32 = 78;
