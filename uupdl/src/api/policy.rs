//! Configurable update policy.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::types::UpdatePolicy;

/// First build that supports virtual edition creation.
pub const DEFAULT_VE_MIN_BUILD: u32 = 17063;

/// SKUs whose images can be converted into virtual editions.
///
/// Core, CoreN, CoreCountrySpecific, CoreSingleLanguage, Professional,
/// ProfessionalN and the Education/Enterprise/Workstation bases.
pub const DEFAULT_VE_SKUS: &[u32] = &[4, 27, 48, 49, 98, 99, 100, 101, 121, 125, 126, 161, 162];

/// A block rule string that is not `build:title marker`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid block rule '{0}': expected build:title")]
pub struct ParseBlockRuleError(pub String);

/// Blocks updates of one build whose title contains a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    pub build: u32,
    pub title_contains: String,
}

impl BlockRule {
    pub fn new(build: u32, title_contains: impl Into<String>) -> Self {
        Self {
            build,
            title_contains: title_contains.into(),
        }
    }

    /// True if the rule matches; title comparison ignores case.
    pub fn matches(&self, build_num: u32, title: &str) -> bool {
        build_num == self.build
            && title
                .to_lowercase()
                .contains(&self.title_contains.to_lowercase())
    }
}

impl FromStr for BlockRule {
    type Err = ParseBlockRuleError;

    /// Parses `build:title marker`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (build, marker) = s
            .split_once(':')
            .ok_or_else(|| ParseBlockRuleError(s.to_string()))?;
        let build = build
            .trim()
            .parse()
            .map_err(|_| ParseBlockRuleError(s.to_string()))?;

        Ok(Self::new(build, marker.trim()))
    }
}

impl fmt::Display for BlockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.build, self.title_contains)
    }
}

/// Update policy driven by static configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPolicy {
    blocked: Vec<BlockRule>,
    ve_min_build: u32,
    ve_skus: Vec<u32>,
}

impl Default for StaticPolicy {
    fn default() -> Self {
        Self {
            blocked: Vec::new(),
            ve_min_build: DEFAULT_VE_MIN_BUILD,
            ve_skus: DEFAULT_VE_SKUS.to_vec(),
        }
    }
}

impl StaticPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block rule.
    pub fn with_block_rule(mut self, rule: BlockRule) -> Self {
        self.blocked.push(rule);
        self
    }

    /// Set the first build supporting virtual editions.
    pub fn with_ve_min_build(mut self, build: u32) -> Self {
        self.ve_min_build = build;
        self
    }

    /// Replace the SKUs eligible for virtual editions.
    pub fn with_ve_skus(mut self, skus: Vec<u32>) -> Self {
        self.ve_skus = skus;
        self
    }

    pub fn block_rules(&self) -> &[BlockRule] {
        &self.blocked
    }
}

impl UpdatePolicy for StaticPolicy {
    fn is_update_blocked(&self, build_num: u32, title: &str) -> bool {
        self.blocked.iter().any(|rule| rule.matches(build_num, title))
    }

    fn are_virtual_editions_supported(&self, build_num: u32, sku: u32) -> bool {
        build_num >= self.ve_min_build && self.ve_skus.contains(&sku)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blocks_nothing() {
        let policy = StaticPolicy::default();
        assert!(!policy.is_update_blocked(22631, "Windows 11"));
    }

    #[test]
    fn test_block_rule_matches_build_and_title() {
        let policy = StaticPolicy::new().with_block_rule(BlockRule::new(26100, "insider"));

        assert!(policy.is_update_blocked(26100, "Windows 11 Insider Preview"));
        assert!(!policy.is_update_blocked(26100, "Windows 11, version 24H2"));
        assert!(!policy.is_update_blocked(26120, "Windows 11 Insider Preview"));
    }

    #[test]
    fn test_block_rule_parse() {
        let rule: BlockRule = "22621: Insider".parse().unwrap();
        assert_eq!(rule, BlockRule::new(22621, "Insider"));
        assert_eq!(rule.to_string(), "22621:Insider");

        assert!("22621".parse::<BlockRule>().is_err());
        assert!("abc:x".parse::<BlockRule>().is_err());
    }

    #[test]
    fn test_virtual_editions_support() {
        let policy = StaticPolicy::default();

        assert!(policy.are_virtual_editions_supported(22631, 48));
        assert!(policy.are_virtual_editions_supported(17063, 101));
        assert!(!policy.are_virtual_editions_supported(16299, 48));
        assert!(!policy.are_virtual_editions_supported(22631, 7));
    }

    #[test]
    fn test_custom_virtual_edition_settings() {
        let policy = StaticPolicy::new()
            .with_ve_min_build(20000)
            .with_ve_skus(vec![7]);

        assert!(policy.are_virtual_editions_supported(20000, 7));
        assert!(!policy.are_virtual_editions_supported(19999, 7));
        assert!(!policy.are_virtual_editions_supported(22631, 48));
    }
}
