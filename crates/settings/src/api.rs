/// One entry of the ZenithOS SDK API catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub label: &'static str,
    pub hint: Option<&'static str>,
}

impl ApiVersion {
    pub fn support(&self) -> SupportBranch {
        SupportBranch::classify(self.label)
    }
}

/// Support status of an SDK release line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportBranch {
    Legacy,
    Unsupported,
    Supported,
    Modern,
    Unknown,
}

impl SupportBranch {
    pub fn classify(label: &str) -> Self {
        if label.starts_with("0.7") {
            SupportBranch::Legacy
        } else if label.starts_with("1.") {
            SupportBranch::Unsupported
        } else if label.starts_with("2.") {
            SupportBranch::Supported
        } else if label.starts_with("3.") {
            SupportBranch::Modern
        } else {
            SupportBranch::Unknown
        }
    }
}

const API_VERSIONS: [ApiVersion; 12] = [
    ApiVersion {
        label: "3.1 (Beta SDK!)",
        hint: Some("Press F1 For more"),
    },
    ApiVersion {
        label: "3.0 (Blue Cosmos)",
        hint: Some("Massive UI overhaul. Press F1 For more"),
    },
    ApiVersion {
        label: "2.3",
        hint: Some("SDK optimized. Press F1 For more"),
    },
    ApiVersion {
        label: "2.2",
        hint: Some("More bug fixes. Press F1 For more"),
    },
    ApiVersion {
        label: "2.1",
        hint: Some("Stability improvements. Press F1 For more"),
    },
    ApiVersion {
        label: "2.0 (Starry Soup)",
        hint: Some("Big update, new SDK engine. Press F1 For more"),
    },
    ApiVersion {
        label: "1.1.2",
        hint: Some("Last minor update of 1.1. Press F1 For more"),
    },
    ApiVersion {
        label: "1.1.1",
        hint: Some("Patch update. Press F1 For more"),
    },
    ApiVersion {
        label: "1.1",
        hint: Some("Added new network protocols.. Press F1 For more"),
    },
    ApiVersion {
        label: "1.0.1",
        hint: Some("Adding support to some network protocols. Press F1 For more"),
    },
    ApiVersion {
        label: "1.0",
        hint: Some("First official release. Press F1 For more"),
    },
    ApiVersion {
        label: "0.7 (Celestial Peak)",
        hint: Some("A very old version. Press F1 For more"),
    },
];

/// SDK versions, newest first.
pub fn api_versions() -> &'static [ApiVersion] {
    &API_VERSIONS
}

/// Hover hint for a version label.
pub fn version_hint(label: &str) -> Option<&'static str> {
    API_VERSIONS
        .iter()
        .find(|version| version.label == label)
        .and_then(|version| version.hint)
}

/// Text of the F1 "Version Info" message for a version label.
pub fn support_notice(label: &str) -> String {
    match SupportBranch::classify(label) {
        SupportBranch::Legacy => "Version has been created in 29.06.2025. Officially, LICGX no longer supports this version. Don't recommend creating apps on it.".to_string(),
        SupportBranch::Unsupported => "Versions in the 1.x branch are no longer supported. The last supported version was 1.1.2.".to_string(),
        SupportBranch::Supported => "Versions in the 2.x branch are fully supported. You can safely develop apps on this branch.".to_string(),
        SupportBranch::Modern => "This branch is modern. Recommended for new apps.".to_string(),
        SupportBranch::Unknown => format!("You pressed F1 for {label}."),
    }
}

/// Target and minimal API versions chosen on the SDK settings tab.
///
/// Held in memory only; saving just confirms the choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSelection {
    pub target: &'static str,
    pub minimal: &'static str,
}

impl Default for ApiSelection {
    fn default() -> Self {
        Self {
            target: API_VERSIONS[0].label,
            minimal: API_VERSIONS[0].label,
        }
    }
}

impl ApiSelection {
    pub fn confirmation(&self) -> String {
        format!(
            "Target version: {}\nMinimal version: {}",
            self.target, self.minimal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_newest_first_and_hinted() {
        let versions = api_versions();
        assert_eq!(versions.len(), 12);
        assert_eq!(versions[0].label, "3.1 (Beta SDK!)");
        assert_eq!(versions[11].label, "0.7 (Celestial Peak)");
        assert!(versions.iter().all(|version| version.hint.is_some()));
        assert_eq!(
            version_hint("2.3"),
            Some("SDK optimized. Press F1 For more")
        );
        assert_eq!(version_hint("9.9"), None);
    }

    #[test]
    fn notices_follow_release_branch() {
        assert!(support_notice("0.7 (Celestial Peak)").contains("no longer supports"));
        assert!(support_notice("1.1.2").contains("1.x branch"));
        assert!(support_notice("2.0 (Starry Soup)").contains("fully supported"));
        assert_eq!(
            support_notice("3.0 (Blue Cosmos)"),
            "This branch is modern. Recommended for new apps."
        );
        assert_eq!(support_notice("x"), "You pressed F1 for x.");
        assert_eq!(api_versions()[1].support(), SupportBranch::Modern);
    }

    #[test]
    fn selection_confirmation_lists_both_versions() {
        let selection = ApiSelection {
            target: "2.3",
            minimal: "2.0 (Starry Soup)",
        };
        assert_eq!(
            selection.confirmation(),
            "Target version: 2.3\nMinimal version: 2.0 (Starry Soup)"
        );
        assert_eq!(ApiSelection::default().target, "3.1 (Beta SDK!)");
    }
}
