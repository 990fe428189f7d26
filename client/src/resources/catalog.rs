/// Icon keys understood by the dashboard and the resource kind each one stands for.
pub static ICONS: [(&str, &str); 18] = [
    ("server", "Virtual Machine"),
    ("globe", "Website / App"),
    ("link", "Subdomain / Link"),
    ("database", "SQL Database"),
    ("hard_drive", "Storage Account"),
    ("network", "Virtual Network"),
    ("key", "Key Vault"),
    ("box", "Container"),
    ("folder_open", "Resource Group"),
    ("cloud", "Cloud Service"),
    ("shield", "Firewall / Security"),
    ("zap", "Load Balancer"),
    ("activity", "Front Door / CDN"),
    ("cpu", "Function App"),
    ("boxes", "App Service"),
    ("container", "Container Registry"),
    ("folder", "Backup / Archive"),
    ("lock", "Private Endpoint"),
];

pub const DEFAULT_ICON: &str = "server";

pub fn is_known_icon(icon: &str) -> bool {
    ICONS.iter().any(|(key, _)| *key == icon)
}

/// Known icon key for `icon`, falling back to [`DEFAULT_ICON`].
pub fn normalize_icon(icon: &str) -> &'static str {
    ICONS
        .iter()
        .map(|(key, _)| *key)
        .find(|key| *key == icon)
        .unwrap_or(DEFAULT_ICON)
}

pub fn icon_label(icon: &str) -> &'static str {
    let key = normalize_icon(icon);
    ICONS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, label)| *label)
        .unwrap_or("Virtual Machine")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_icons() {
        assert_eq!(icon_label("server"), "Virtual Machine");
        assert_eq!(icon_label("database"), "SQL Database");
        assert!(is_known_icon("lock"));
    }

    #[test]
    fn test_unknown_icon_falls_back_to_server() {
        assert!(!is_known_icon("satellite"));
        assert_eq!(normalize_icon("satellite"), "server");
        assert_eq!(icon_label("satellite"), "Virtual Machine");
    }
}
