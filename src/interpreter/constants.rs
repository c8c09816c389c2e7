// Constants for the script interpreter

/// Default number of steps (statements, loop iterations, calls) one run may take
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Default limit on the byte length of any string a script builds
pub const DEFAULT_MAX_STRING_LEN: usize = 1024 * 1024;

/// Default limit on the total bytes `console.log` may capture in one run
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 1024 * 1024;

/// Longest array a script may create; larger lengths throw a RangeError
pub const MAX_ARRAY_LENGTH: usize = 1 << 20;

/// Methods reachable through `"text".name`
pub const STRING_METHODS: &[&str] = &[
    "at",
    "charAt",
    "charCodeAt",
    "concat",
    "endsWith",
    "includes",
    "indexOf",
    "lastIndexOf",
    "padEnd",
    "padStart",
    "repeat",
    "replace",
    "replaceAll",
    "slice",
    "split",
    "startsWith",
    "substring",
    "toLowerCase",
    "toString",
    "toUpperCase",
    "trim",
    "trimEnd",
    "trimStart",
];

/// Methods reachable through `[...].name`
pub const ARRAY_METHODS: &[&str] = &[
    "at",
    "concat",
    "every",
    "filter",
    "find",
    "findIndex",
    "forEach",
    "includes",
    "indexOf",
    "join",
    "map",
    "pop",
    "push",
    "reduce",
    "reverse",
    "shift",
    "slice",
    "some",
    "sort",
    "toString",
    "unshift",
];

/// Methods reachable through `(42).name` and `true.name`
pub const NUMBER_METHODS: &[&str] = &["toFixed", "toString"];
