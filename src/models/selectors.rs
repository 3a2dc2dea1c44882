// src/models/selectors.rs

//! Declarative rule locating a direct image link in page markup.

use std::collections::BTreeMap;

use scraper::node::Element;
use serde::{Deserialize, Serialize};

/// Where to find the direct resource link on a scraped page.
///
/// Serialized as a flat object: `{"name": "meta", "property": "og:image",
/// "link": "content"}`. Every key other than `name` and `link` is an
/// attribute matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectorRule {
    /// Tag name of the element holding the link
    pub name: String,

    /// Attribute of the matched element that contains the link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Attribute name to expected value
    #[serde(flatten)]
    pub attrs: BTreeMap<String, String>,
}

impl SelectorRule {
    /// Create a rule for `name` elements whose `link` attribute holds the URL.
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: Some(link.into()),
            attrs: BTreeMap::new(),
        }
    }

    /// Add an attribute matcher.
    pub fn with_attr(mut self, attr: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(attr.into(), value.into());
        self
    }

    /// Attribute holding the link, if the rule defines one.
    pub fn link_attr(&self) -> Option<&str> {
        self.link.as_deref().filter(|link| !link.is_empty())
    }

    /// Check whether an element satisfies the tag name and every matcher.
    ///
    /// `class` matches against individual class tokens as well as the whole
    /// attribute value.
    pub fn matches(&self, element: &Element) -> bool {
        if !element.name().eq_ignore_ascii_case(&self.name) {
            return false;
        }

        self.attrs.iter().all(|(attr, expected)| match element.attr(attr) {
            Some(actual) if attr == "class" => {
                actual == expected || actual.split_whitespace().any(|token| token == expected)
            }
            Some(actual) => actual == expected,
            None => false,
        })
    }
}
