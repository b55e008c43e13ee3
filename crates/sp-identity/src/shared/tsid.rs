//! Prefixed, time-sorted identifiers
//!
//! Every aggregate and entity id in the identity core is a short type prefix
//! followed by a 13 character Crockford Base32 TSID, e.g. `user_0HZXEQ5Y8JY5Z`.
//! Ids generated later sort after ids generated earlier (millisecond
//! resolution), which keeps event streams and membership lists readable.

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const ENCODED_LEN: usize = 13;

static COUNTER: AtomicU16 = AtomicU16::new(0);

/// Id prefixes used by the identity core.
pub mod prefixes {
    pub const END_USER: &str = "user";
    pub const MEMBERSHIP: &str = "mbr";
    pub const EVENT: &str = "evt";
    pub const EXECUTION: &str = "exec";
}

pub struct IdGenerator;

impl IdGenerator {
    /// `{prefix}_{tsid}`
    pub fn generate(prefix: &str) -> String {
        format!("{}_{}", prefix, Self::tsid())
    }

    /// Bare TSID: 42 bits of milliseconds, 10 random bits, 12 counter bits.
    pub fn tsid() -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) as u64;
        let random = rand::random::<u16>() as u64 & 0x3FF;

        let value = ((now & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);
        encode_crockford(value)
    }

    /// Check that `id` is `{prefix}_{13 Crockford chars}`.
    pub fn is_valid(id: &str, prefix: &str) -> bool {
        id.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
            .map(|tsid| tsid.len() == ENCODED_LEN && tsid.bytes().all(|b| ALPHABET.contains(&b)))
            .unwrap_or(false)
    }
}

fn encode_crockford(mut value: u64) -> String {
    let mut out = [b'0'; ENCODED_LEN];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    out.iter().map(|b| *b as char).collect()
}
