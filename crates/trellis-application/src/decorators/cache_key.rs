//! Cache key derivation
//!
//! Keys are built from a scope and a discriminator joined by `@`:
//!
//! | Policy key | Resulting key |
//! |------------|---------------|
//! | `None` | `scope@<sha256 of all arguments>` |
//! | `"all"` | `scope@all` |
//! | `":userId"` | `scope@<value of the userId argument>` |

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;
use trellis_domain::value_objects::{CachePolicy, MethodSignature};

/// Separator between key segments
pub const KEY_SEPARATOR: &str = "@";

/// Join key segments, normalizing `:` to the separator
pub fn generate_cache_key<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
        .replace(':', KEY_SEPARATOR)
}

/// Derive the key for a call from its policy, declared signature and arguments
///
/// A `:name` template is resolved through the signature by name. If the
/// signature does not declare the name, the first argument is used.
pub fn resolve_cache_key(
    policy: &CachePolicy,
    signature: Option<&MethodSignature>,
    args: &[Value],
) -> String {
    let discriminator = match policy.key.as_deref() {
        None => hash_arguments(args),
        Some(template) => match template.strip_prefix(':') {
            Some(name) => {
                let position = signature.and_then(|s| s.position_of(name)).or_else(|| {
                    warn!(
                        scope = %policy.scope,
                        param = name,
                        "cache key parameter not declared, using first argument"
                    );
                    (!args.is_empty()).then_some(0)
                });
                position
                    .and_then(|index| args.get(index))
                    .map_or_else(|| name.to_string(), key_fragment)
            }
            None => template.to_string(),
        },
    };
    generate_cache_key(&[policy.scope.as_str(), discriminator.as_str()])
}

fn key_fragment(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => stable_stringify(other),
    }
}

fn hash_arguments(args: &[Value]) -> String {
    let joined = args.iter().map(stable_stringify).collect::<Vec<_>>().join(",");
    hex::encode(Sha256::digest(joined.as_bytes()))
}

/// JSON rendering with object keys sorted at every level
pub fn stable_stringify(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| format!("{}:{}", Value::String(key.clone()), stable_stringify(&map[key])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(stable_stringify).collect();
            format!("[{}]", items.join(","))
        }
        scalar => scalar.to_string(),
    }
}
