pub const CLIENT_SETUP_TAG: u8 = 0x01;
pub const SERVER_SETUP_TAG: u8 = 0x02;
pub const SUBSCRIBE_TAG: u8 = 0x03;
pub const SUBSCRIBE_OK_TAG: u8 = 0x04;
pub const SUBSCRIBE_ERROR_TAG: u8 = 0x05;

pub const VARINT_PREFIX_SHIFT: u32 = 6;
pub const VARINT_VALUE_MASK: u8 = 0x3f;

pub const SETUP_PARAM_PATH: u64 = 0x01;
pub const SETUP_PARAM_MAX_REQUEST_ID: u64 = 0x02;
pub const SETUP_PARAM_MAX_AUTH_TOKEN_CACHE_SIZE: u64 = 0x04;
