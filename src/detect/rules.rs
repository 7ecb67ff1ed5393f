use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::detect::classifier::attribute_text;
use crate::page::error::PageError;
use crate::page::page_model::ElementDescriptor;

// ============================================================================
// Discovery rules: attribute patterns evaluated against every <input>
// ============================================================================

/// Which attribute a rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAttr {
    Type,
    Name,
    Id,
    Placeholder,
    Autocomplete,
    Class,
    TestId,
    DataCy,
    AriaLabel,
    /// Class list of any enclosing element.
    ContainerClass,
    /// Test hooks of any enclosing element.
    ContainerTestId,
    /// Lower-cased concatenation of every classified attribute.
    AttributeText,
}

impl RuleAttr {
    fn css_name(&self) -> &'static str {
        match self {
            RuleAttr::Type => "type",
            RuleAttr::Name => "name",
            RuleAttr::Id => "id",
            RuleAttr::Placeholder => "placeholder",
            RuleAttr::Autocomplete => "autocomplete",
            RuleAttr::Class => "class",
            RuleAttr::TestId => "data-testid",
            RuleAttr::DataCy => "data-cy",
            RuleAttr::AriaLabel => "aria-label",
            RuleAttr::ContainerClass => "class",
            RuleAttr::ContainerTestId => "data-testid",
            RuleAttr::AttributeText => "*",
        }
    }

    fn values(&self, el: &ElementDescriptor) -> Vec<String> {
        let single = |v: &Option<String>| v.iter().cloned().collect::<Vec<_>>();
        match self {
            RuleAttr::Type => single(&el.input_type),
            RuleAttr::Name => single(&el.name),
            RuleAttr::Id => single(&el.id),
            RuleAttr::Placeholder => single(&el.placeholder),
            RuleAttr::Autocomplete => single(&el.autocomplete),
            RuleAttr::Class => single(&el.class_name),
            RuleAttr::TestId => single(&el.test_id),
            RuleAttr::DataCy => single(&el.data_cy),
            RuleAttr::AriaLabel => single(&el.aria_label),
            RuleAttr::ContainerClass => el
                .container_classes
                .iter()
                .flat_map(|c| c.split_whitespace())
                .map(str::to_string)
                .collect(),
            RuleAttr::ContainerTestId => el.container_test_ids.clone(),
            RuleAttr::AttributeText => vec![attribute_text(el)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePattern {
    /// Case-insensitive equality.
    Equals(String),
    /// Case-insensitive substring.
    Contains(String),
    /// Attribute is missing.
    Absent,
    /// Case-insensitive regular expression.
    Regex(String),
}

/// One attribute-matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRule {
    pub attr: RuleAttr,
    pub pattern: RulePattern,
    /// Never match `type="password"` inputs.
    pub skip_password: bool,
}

impl DiscoveryRule {
    pub fn new(attr: RuleAttr, pattern: RulePattern) -> Self {
        Self {
            attr,
            pattern,
            skip_password: false,
        }
    }

    pub fn equals(attr: RuleAttr, value: &str) -> Self {
        Self::new(attr, RulePattern::Equals(value.to_string()))
    }

    pub fn contains(attr: RuleAttr, value: &str) -> Self {
        Self::new(attr, RulePattern::Contains(value.to_lowercase()))
    }

    pub fn absent(attr: RuleAttr) -> Self {
        Self::new(attr, RulePattern::Absent)
    }

    /// User-supplied pattern matched against the attribute text.
    pub fn regex(pattern: &str) -> Self {
        Self::new(RuleAttr::AttributeText, RulePattern::Regex(pattern.to_string()))
    }

    pub fn not_password(mut self) -> Self {
        self.skip_password = true;
        self
    }

    /// Prepare the rule for matching. Fails only for regex rules that do not compile.
    pub fn compile(&self) -> Result<RuleMatcher<'_>, PageError> {
        let regex = match &self.pattern {
            RulePattern::Regex(source) => Some(
                RegexBuilder::new(source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| PageError::InvalidPattern {
                        pattern: source.clone(),
                        source: e,
                    })?,
            ),
            _ => None,
        };
        Ok(RuleMatcher { rule: self, regex })
    }
}

impl fmt::Display for DiscoveryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = self.attr.css_name();
        let condition = match &self.pattern {
            RulePattern::Equals(v) => format!("[{}=\"{}\"]", attr, v),
            RulePattern::Contains(v) => format!("[{}*=\"{}\" i]", attr, v),
            RulePattern::Absent => format!(":not([{}])", attr),
            RulePattern::Regex(v) => format!("[{}~/{}/i]", attr, v),
        };
        let password = if self.skip_password {
            ":not([type=\"password\"])"
        } else {
            ""
        };

        match self.attr {
            RuleAttr::ContainerClass | RuleAttr::ContainerTestId => {
                write!(f, "{} input{}", condition, password)
            }
            _ => write!(f, "input{}{}", condition, password),
        }
    }
}

/// A compiled rule ready to test descriptors.
pub struct RuleMatcher<'a> {
    rule: &'a DiscoveryRule,
    regex: Option<Regex>,
}

impl RuleMatcher<'_> {
    pub fn matches(&self, el: &ElementDescriptor) -> bool {
        if !el.is_input() {
            return false;
        }
        if self.rule.skip_password && el.declared_type().eq_ignore_ascii_case("password") {
            return false;
        }

        let values = self.rule.attr.values(el);
        match &self.rule.pattern {
            RulePattern::Absent => values.is_empty(),
            RulePattern::Equals(expected) => {
                values.iter().any(|v| v.eq_ignore_ascii_case(expected))
            }
            RulePattern::Contains(needle) => {
                values.iter().any(|v| v.to_lowercase().contains(needle.as_str()))
            }
            RulePattern::Regex(_) => match &self.regex {
                Some(re) => values.iter().any(|v| re.is_match(v)),
                None => false,
            },
        }
    }
}

/// The ordered built-in rule set.
pub fn builtin_rules() -> Vec<DiscoveryRule> {
    use RuleAttr::*;

    vec![
        // Standard email inputs
        DiscoveryRule::equals(Type, "email"),
        DiscoveryRule::contains(Name, "email"),
        DiscoveryRule::contains(Id, "email"),
        DiscoveryRule::contains(Placeholder, "email"),
        DiscoveryRule::equals(Autocomplete, "email"),
        DiscoveryRule::equals(Autocomplete, "username"),
        // Common variations
        DiscoveryRule::contains(Name, "mail"),
        DiscoveryRule::contains(Id, "mail"),
        DiscoveryRule::contains(Placeholder, "mail"),
        DiscoveryRule::contains(Name, "user").not_password(),
        DiscoveryRule::contains(Id, "user").not_password(),
        DiscoveryRule::contains(Name, "login").not_password(),
        DiscoveryRule::contains(Id, "login").not_password(),
        // Plain text inputs that might hold an email
        DiscoveryRule::equals(Type, "text"),
        DiscoveryRule::absent(Type),
        // Test hooks and accessibility labels
        DiscoveryRule::contains(TestId, "email"),
        DiscoveryRule::contains(DataCy, "email"),
        DiscoveryRule::contains(Class, "email"),
        DiscoveryRule::contains(AriaLabel, "email"),
        // Inputs inside email-ish containers
        DiscoveryRule::equals(ContainerClass, "email"),
        DiscoveryRule::equals(ContainerClass, "mail"),
        DiscoveryRule::equals(ContainerClass, "login"),
        DiscoveryRule::contains(ContainerClass, "email"),
        DiscoveryRule::contains(ContainerClass, "mail"),
        DiscoveryRule::contains(ContainerTestId, "email"),
    ]
}
