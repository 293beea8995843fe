//! References to other containers (links, volumes-from, `container:` network mode).

use std::fmt;
use std::str::FromStr;

/// Name of a container, optionally scoped by a namespace (`namespace.name`).
///
/// Build it with [`ContainerName::new`] or `FromStr`; both keep the value
/// representable as `namespace.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerName {
    pub namespace: String,
    pub name: String,
}

impl ContainerName {
    /// The namespace may not contain `.`, and an unscoped name may not
    /// either, since the first dot separates the two.
    pub fn new(namespace: &str, name: &str) -> std::result::Result<Self, String> {
        let display = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{namespace}.{name}")
        };
        if name.is_empty() || name.contains(':') || namespace.contains([':', '.']) {
            return Err(format!("invalid container name: '{}'", display));
        }
        if namespace.is_empty() && name.contains('.') {
            return Err(format!(
                "invalid container name: '{}' (unscoped names cannot contain '.')",
                name
            ));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl FromStr for ContainerName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (namespace, name) = s.split_once('.').unwrap_or(("", s));
        if namespace.is_empty() && s.contains('.') {
            return Err(format!("invalid container name: '{}'", s));
        }
        Self::new(namespace, name)
    }
}

/// A link to another container, rendered as `namespace.name:alias`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub container: ContainerName,
    pub alias: String,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.alias)
    }
}

impl FromStr for Link {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (container, alias) = match s.trim().split_once(':') {
            Some((container, alias)) => (container, Some(alias)),
            None => (s.trim(), None),
        };
        let container: ContainerName = container
            .parse()
            .map_err(|e| format!("invalid link '{}': {}", s, e))?;
        let alias = match alias {
            Some("") => return Err(format!("invalid link '{}': empty alias", s)),
            Some(alias) => alias.to_string(),
            None => container.name.clone(),
        };
        Ok(Self { container, alias })
    }
}

string_serde!(ContainerName);
string_serde!(Link);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_name_parse() {
        let name: ContainerName = "web".parse().unwrap();
        assert_eq!(name, ContainerName::new("", "web").unwrap());
        assert_eq!(name.to_string(), "web");

        let name: ContainerName = "shop.db".parse().unwrap();
        assert_eq!(name, ContainerName::new("shop", "db").unwrap());
        assert_eq!(name.to_string(), "shop.db");
    }

    #[test]
    fn test_container_name_errors() {
        assert!("".parse::<ContainerName>().is_err());
        assert!("shop.".parse::<ContainerName>().is_err());
        assert!("db:alias".parse::<ContainerName>().is_err());
        assert!(".db".parse::<ContainerName>().is_err());
    }

    #[test]
    fn test_new_rejects_unrepresentable_names() {
        assert!(ContainerName::new("", "a.b").is_err());
        assert!(ContainerName::new("a.b", "c").is_err());
        assert!(ContainerName::new("shop", "").is_err());
        assert!(ContainerName::new("shop", "db:1").is_err());
    }

    #[test]
    fn test_new_roundtrips_through_string() {
        for (namespace, name) in [("", "web"), ("shop", "db"), ("shop", "db.replica")] {
            let built = ContainerName::new(namespace, name).unwrap();
            let parsed: ContainerName = built.to_string().parse().unwrap();
            assert_eq!(parsed, built);
        }
    }

    #[test]
    fn test_link_default_alias() {
        let link: Link = "shop.db".parse().unwrap();
        assert_eq!(link.alias, "db");
        assert_eq!(link.to_string(), "shop.db:db");
    }

    #[test]
    fn test_link_explicit_alias() {
        let link: Link = "redis:cache".parse().unwrap();
        assert_eq!(link.container.name, "redis");
        assert_eq!(link.alias, "cache");
        assert_eq!(link.to_string(), "redis:cache");
    }

    #[test]
    fn test_link_errors() {
        assert!("redis:".parse::<Link>().is_err());
        assert!(":cache".parse::<Link>().is_err());
    }

    #[test]
    fn test_serde_string_form() {
        let links: Vec<Link> = serde_yaml::from_str("- db\n- cache:redis\n").unwrap();
        assert_eq!(serde_json::to_string(&links).unwrap(), r#"["db:db","cache:redis"]"#);
    }
}
