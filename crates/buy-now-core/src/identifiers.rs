//! Instance identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effects::{PhysicalTimeEffects, RandomEffects};

const ID_PREFIX: &str = "buy-now";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque token naming one mounted widget instance.
///
/// Shaped `buy-now-<epoch ms>-<9 base36 chars>`. Uniqueness is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a fresh id from the current time and a random suffix
    pub fn generate(time: &dyn PhysicalTimeEffects, random: &dyn RandomEffects) -> Self {
        Self::from_parts(time.now_ms(), random.random_u64())
    }

    /// Build an id from a timestamp and the entropy its suffix is drawn from
    pub fn from_parts(now_ms: u64, mut entropy: u64) -> Self {
        let mut suffix = String::with_capacity(SUFFIX_LEN);
        for _ in 0..SUFFIX_LEN {
            suffix.push(char::from(BASE36[(entropy % 36) as usize]));
            entropy /= 36;
        }
        Self(format!("{ID_PREFIX}-{now_ms}-{suffix}"))
    }

    /// Id of the wrapper node created inside an isolated scope
    pub fn wrapper_id(&self) -> String {
        format!("buy-now-wrapper-{}", self.0)
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u64);

    impl PhysicalTimeEffects for Fixed {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    impl RandomEffects for Fixed {
        fn random_u64(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn id_shape() {
        let id = InstanceId::generate(&Fixed(1_699_999_999_999), &Fixed(0));
        assert_eq!(id.as_str(), "buy-now-1699999999999-000000000");
        assert_eq!(
            id.wrapper_id(),
            "buy-now-wrapper-buy-now-1699999999999-000000000"
        );
    }

    #[test]
    fn suffix_is_base36() {
        let id = InstanceId::generate(&Fixed(1), &Fixed(u64::MAX));
        let suffix = id.as_str().rsplit('-').next().unwrap_or_default();
        assert_eq!(suffix.len(), 9);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
