//! Process-wide key listeners
//!
//! Hosts feed key presses into [`dispatch`]; components interested in a key
//! call [`listen`] and keep the returned [`ListenerGuard`] alive for as long as
//! they want to be notified. Dropping the guard unregisters the listener, so
//! every exit path releases it.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, trace};

/// Keys the filter reacts to
///
/// Serialized as the same text [`FromStr`](std::str::FromStr) accepts, so
/// configuration files can say `esc` or `q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    Char(char),
}

impl std::str::FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Escape" | "Esc" | "escape" | "esc" => Ok(Key::Escape),
            "Enter" | "enter" => Ok(Key::Enter),
            "Backspace" | "backspace" => Ok(Key::Backspace),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(format!("unknown key '{}'", other)),
                }
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Escape => write!(f, "Escape"),
            Key::Enter => write!(f, "Enter"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

type ListenerFn = Arc<dyn Fn(Key) + Send + Sync>;

struct Registry {
    next_id: u64,
    entries: Vec<(u64, Key, ListenerFn)>,
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| {
    Mutex::new(Registry {
        next_id: 1,
        entries: Vec::new(),
    })
});

/// Registration handle; unregisters on drop
#[must_use = "the listener is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    key: Key,
}

impl ListenerGuard {
    pub fn key(&self) -> Key {
        self.key
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut registry = REGISTRY.lock();
        registry.entries.retain(|(id, _, _)| *id != self.id);
        debug!("Key listener #{} for {} removed", self.id, self.key);
    }
}

/// Register `listener` for presses of `key`
pub fn listen<F>(key: Key, listener: F) -> ListenerGuard
where
    F: Fn(Key) + Send + Sync + 'static,
{
    let mut registry = REGISTRY.lock();
    let id = registry.next_id;
    registry.next_id += 1;
    registry.entries.push((id, key, Arc::new(listener)));
    debug!("Key listener #{} for {} registered", id, key);
    ListenerGuard { id, key }
}

/// Deliver a key press to every matching listener
///
/// Listeners run outside the registry lock, so they may register or drop
/// guards themselves. Returns the number of listeners notified.
pub fn dispatch(key: Key) -> usize {
    let matching: Vec<ListenerFn> = {
        let registry = REGISTRY.lock();
        registry
            .entries
            .iter()
            .filter(|(_, k, _)| *k == key)
            .map(|(_, _, f)| Arc::clone(f))
            .collect()
    };

    trace!("Key {} pressed, {} listener(s)", key, matching.len());
    for listener in &matching {
        listener(key);
    }
    matching.len()
}

/// Number of registered listeners (all keys)
pub fn listener_count() -> usize {
    REGISTRY.lock().entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    #[serial]
    fn test_listen_and_dispatch() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let guard = listen(Key::Escape, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(dispatch(Key::Escape), 1);
        assert_eq!(dispatch(Key::Enter), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(guard);
        assert_eq!(dispatch(Key::Escape), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_no_leak_across_cycles() {
        let before = listener_count();
        for _ in 0..10 {
            let _guard = listen(Key::Escape, |_| {});
            assert_eq!(listener_count(), before + 1);
        }
        assert_eq!(listener_count(), before);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!("Escape".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("q".parse::<Key>().unwrap(), Key::Char('q'));
        assert!("F13".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_serde_uses_text_form() {
        assert_eq!(serde_json::to_string(&Key::Escape).unwrap(), r#""Escape""#);
        assert_eq!(serde_json::to_string(&Key::Char('q')).unwrap(), r#""q""#);
        assert_eq!(serde_json::from_str::<Key>(r#""esc""#).unwrap(), Key::Escape);
        assert_eq!(serde_json::from_str::<Key>(r#""q""#).unwrap(), Key::Char('q'));
        assert!(serde_json::from_str::<Key>(r#""F13""#).is_err());
    }
}
