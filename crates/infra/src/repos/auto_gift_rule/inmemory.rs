use super::IAutoGiftRuleRepo;
use crate::repos::shared::inmemory_repo::*;
use autogift_domain::{AutoGiftRule, ID};

pub struct InMemoryAutoGiftRuleRepo {
    rules: std::sync::Mutex<Vec<AutoGiftRule>>,
}

impl InMemoryAutoGiftRuleRepo {
    pub fn new() -> Self {
        Self {
            rules: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAutoGiftRuleRepo for InMemoryAutoGiftRuleRepo {
    async fn insert(&self, rule: &AutoGiftRule) -> anyhow::Result<()> {
        insert(rule, &self.rules);
        Ok(())
    }

    async fn save(&self, rule: &AutoGiftRule) -> anyhow::Result<()> {
        save(rule, &self.rules);
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> anyhow::Result<Option<AutoGiftRule>> {
        Ok(find(rule_id, &self.rules))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<AutoGiftRule>> {
        let mut rules = find_by(&self.rules, |rule| rule.user_id == *user_id);
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.created));
        Ok(rules)
    }
}
