use crate::domain::model::Tenant;
use crate::domain::ports::TenantRegistry;
use subtle::ConstantTimeEq;

/// Tenants loaded once from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticTenantRegistry {
    tenants: Vec<Tenant>,
}

impl StaticTenantRegistry {
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self { tenants }
    }
}

impl TenantRegistry for StaticTenantRegistry {
    fn find_by_api_key(&self, api_key: &str) -> Option<Tenant> {
        if api_key.is_empty() {
            return None;
        }

        // compare against every tenant so lookup time does not depend on position
        let mut found = None;
        for tenant in &self.tenants {
            let matches: bool = tenant.api_key.as_bytes().ct_eq(api_key.as_bytes()).into();
            if matches && found.is_none() {
                found = Some(tenant);
            }
        }
        found.cloned()
    }

    fn tenant_count(&self) -> usize {
        self.tenants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StaticTenantRegistry {
        StaticTenantRegistry::new(vec![
            Tenant {
                phone_number: "+15550000001".to_string(),
                api_key: "key-one".to_string(),
            },
            Tenant {
                phone_number: "+15550000002".to_string(),
                api_key: "key-two".to_string(),
            },
        ])
    }

    #[test]
    fn test_find_by_api_key() {
        let registry = registry();
        assert_eq!(
            registry.find_by_api_key("key-two").unwrap().phone_number,
            "+15550000002"
        );
        assert!(registry.find_by_api_key("key-three").is_none());
        assert!(registry.find_by_api_key("key").is_none());
        assert!(registry.find_by_api_key("").is_none());
        assert_eq!(registry.tenant_count(), 2);
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = registry();
        assert!(registry.find_by_api_key("KEY-ONE").is_none());
        assert!(registry.find_by_api_key(" key-one").is_none());
    }
}
