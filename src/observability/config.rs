use std::env;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    fn from_lookup<F>(component: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let component = component.trim().to_string();

        let service_name = lookup("SERVICE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = lookup("STAGE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_falls_back_to_component() {
        let config = ObservabilityConfig::from_lookup(" music-catalog ", |_| None);

        assert_eq!(config.service_context.service_name, "music-catalog");
        assert_eq!(config.service_context.component, "music-catalog");
        assert_eq!(config.service_context.environment, "unknown");
    }

    #[test]
    fn explicit_service_name_and_stage_are_used() {
        let config = ObservabilityConfig::from_lookup("music-catalog", |key| match key {
            "SERVICE_NAME" => Some("catalog-api".to_string()),
            "STAGE" => Some("staging".to_string()),
            _ => None,
        });

        assert_eq!(config.service_context.service_name, "catalog-api");
        assert_eq!(config.service_context.environment, "staging");
    }
}
