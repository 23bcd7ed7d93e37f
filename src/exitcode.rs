//! Process exit codes, following BSD sysexits.h

/// No field catalog given on the command line or in settings
pub const USAGE: i32 = 64;

/// A document that does not parse, or a tree the catalog cannot render or edit
pub const DATAERR: i32 = 65;

/// Serialization failure or an editor used before rendering
pub const SOFTWARE: i32 = 70;

/// Reading or writing a document failed
pub const IOERR: i32 = 74;

/// Settings could not be loaded
pub const CONFIG: i32 = 78;
