//! Base plugin trait definition.
//!
//! All parser plugins implement [`Plugin`], which provides lifecycle
//! management and metadata. Plugins are stored in `Arc<dyn Trait>` and called
//! through shared references, so implementations needing mutable state use
//! interior mutability (`Mutex`, `RwLock`, atomics).

use crate::Result;

/// Base trait that all plugins must implement.
///
/// # Thread Safety
///
/// All plugins must be `Send + Sync`; the host may consume documents from
/// multiple workers.
///
/// # Example
///
/// ```rust
/// use moabit::plugins::Plugin;
/// use moabit::Result;
///
/// struct MyPlugin;
///
/// impl Plugin for MyPlugin {
///     fn name(&self) -> &str {
///         "my-plugin"
///     }
///
///     fn version(&self) -> String {
///         "1.0.0".to_string()
///     }
///
///     fn initialize(&self) -> Result<()> {
///         Ok(())
///     }
///
///     fn shutdown(&self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin: lowercase, hyphenated, no whitespace.
    fn name(&self) -> &str;

    /// Semantic version of this plugin.
    fn version(&self) -> String;

    /// Called once when the plugin is registered. The plugin is not
    /// registered if this returns an error.
    fn initialize(&self) -> Result<()>;

    /// Called when the plugin is unregistered or the application shuts down.
    fn shutdown(&self) -> Result<()>;

    /// Optional plugin description for debugging and logging.
    fn description(&self) -> &str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct TestPlugin {
        initialized: AtomicBool,
    }

    impl Plugin for TestPlugin {
        fn name(&self) -> &str {
            "test-plugin"
        }

        fn version(&self) -> String {
            "1.0.0".to_string()
        }

        fn initialize(&self) -> Result<()> {
            self.initialized.store(true, Ordering::Release);
            Ok(())
        }

        fn shutdown(&self) -> Result<()> {
            self.initialized.store(false, Ordering::Release);
            Ok(())
        }

        fn description(&self) -> &str {
            "A test plugin"
        }
    }

    #[test]
    fn test_plugin_metadata() {
        let plugin = TestPlugin {
            initialized: AtomicBool::new(false),
        };
        assert_eq!(plugin.name(), "test-plugin");
        assert_eq!(plugin.version(), "1.0.0");
        assert_eq!(plugin.description(), "A test plugin");
    }

    #[test]
    fn test_plugin_lifecycle() {
        let plugin = TestPlugin {
            initialized: AtomicBool::new(false),
        };

        assert!(!plugin.initialized.load(Ordering::Acquire));

        plugin.initialize().unwrap();
        assert!(plugin.initialized.load(Ordering::Acquire));

        plugin.shutdown().unwrap();
        assert!(!plugin.initialized.load(Ordering::Acquire));
    }
}
