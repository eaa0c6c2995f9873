// src/constants.rs

pub const DEFAULT_CONFIG_PATH: &str = "/etc/microftpd.conf";

/// Longest control line accepted, CRLF included.
pub const MAX_COMMAND_LENGTH: usize = 512;

/// Upper bound for `chunk_size`; a chunk must fit one storage write.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

pub const UNKNOWN_COMMAND_REPLY: &[u8] = b"520 not implement.\r\n";
pub const COMMAND_TOO_LONG_REPLY: &[u8] = b"500 Command too long.\r\n";
