// Process exit codes, following the BSD sysexits convention

pub const SUCCESS: i32 = 0;

pub mod usage {
    pub const INVALID_ARGUMENTS: i32 = 64;
}

pub mod data {
    pub const INVALID_INPUT: i32 = 65;
}

pub mod service {
    pub const UNAVAILABLE: i32 = 69;
}

pub mod system {
    pub const INTERNAL: i32 = 70;
    pub const IO: i32 = 74;
    pub const CONFIG: i32 = 78;
}
