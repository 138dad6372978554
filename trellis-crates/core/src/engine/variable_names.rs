use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;

/// The optional names of the domains, used for lookups and readable output.
///
/// A name is given once, when the domain is created. If two domains share a name, a lookup by
/// that name finds the one created last.
#[derive(Debug, Default, Clone)]
pub(crate) struct VariableNames {
    names: KeyedVec<DomainId, Option<String>>,
    domains: HashMap<String, DomainId>,
}

impl VariableNames {
    pub(crate) fn name(&self, domain: DomainId) -> Option<&str> {
        self.names.get(domain).and_then(|name| name.as_deref())
    }

    pub(crate) fn domain(&self, name: &str) -> Option<DomainId> {
        self.domains.get(name).copied()
    }

    pub(crate) fn set_name(&mut self, domain: DomainId, name: String) {
        self.names.accommodate(domain, None);
        let _ = self.domains.insert(name.clone(), domain);
        self.names[domain] = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn unnamed_domains_have_no_name() {
        let mut names = VariableNames::default();
        names.set_name(DomainId::create_from_index(2), "z".to_owned());

        assert_eq!(names.name(DomainId::create_from_index(0)), None);
        assert_eq!(names.name(DomainId::create_from_index(5)), None);
        assert_eq!(names.name(DomainId::create_from_index(2)), Some("z"));
    }

    #[test]
    fn a_shared_name_finds_the_last_domain() {
        let mut names = VariableNames::default();
        let first = DomainId::create_from_index(0);
        let second = DomainId::create_from_index(1);

        names.set_name(first, "x".to_owned());
        names.set_name(second, "x".to_owned());

        assert_eq!(names.domain("x"), Some(second));
        assert_eq!(names.name(first), Some("x"));
        assert_eq!(names.domain("y"), None);
    }
}
