use std::collections::HashSet;

use crate::errors::BotResult;

/// Durable id -> content digest map used to skip unchanged articles
#[cfg_attr(test, mockall::automock)]
pub trait HashStore: Send {
    fn load(&mut self) -> BotResult<()>;
    fn has_changed(&self, id: &str, content: &str) -> bool;
    fn update_hash(&mut self, id: &str, content: &str);
    fn save(&self) -> BotResult<()>;
    /// Drop entries whose id is not in `active_ids`
    fn cleanup(&mut self, active_ids: &HashSet<String>);
}
