//! Provider feature flags
//!
//! The `features` block toggles lifecycle behaviour per resource family,
//! e.g. whether a Key Vault is purged on destroy. Each group is written as
//! a single-element list (or a plain mapping). Keys a user leaves out keep
//! their default, so an empty block and a missing block behave the same.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

macro_rules! feature_group {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident: $default:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(pub $field: bool,)+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default,)+
                }
            }
        }
    };
}

feature_group!(ApiManagementFeatures {
    purge_soft_delete_on_destroy: true,
    recover_soft_deleted: true,
});

feature_group!(AppConfigurationFeatures {
    purge_soft_delete_on_destroy: true,
    recover_soft_deleted: true,
});

feature_group!(ApplicationInsightsFeatures {
    disable_generated_rule: false,
});

feature_group!(CognitiveAccountFeatures {
    purge_soft_delete_on_destroy: true,
});

feature_group!(KeyVaultFeatures {
    purge_soft_delete_on_destroy: true,
    purge_soft_deleted_certificates_on_destroy: true,
    purge_soft_deleted_keys_on_destroy: true,
    purge_soft_deleted_secrets_on_destroy: true,
    purge_soft_deleted_hardware_security_modules_on_destroy: true,
    purge_soft_deleted_hardware_security_module_keys_on_destroy: true,
    recover_soft_deleted_certificates: true,
    recover_soft_deleted_keys: true,
    recover_soft_deleted_key_vaults: true,
    recover_soft_deleted_secrets: true,
    recover_soft_deleted_hardware_security_module_keys: true,
});

feature_group!(LogAnalyticsWorkspaceFeatures {
    permanently_delete_on_destroy: false,
});

feature_group!(ManagedDiskFeatures {
    expand_without_downtime: true,
});

feature_group!(TemplateDeploymentFeatures {
    delete_nested_items_during_deletion: true,
});

feature_group!(VirtualMachineFeatures {
    detach_implicit_data_disk_on_deletion: false,
    delete_os_disk_on_deletion: true,
    graceful_shutdown: false,
    skip_shutdown_and_force_delete: false,
});

feature_group!(VirtualMachineScaleSetFeatures {
    force_delete: false,
    reimage_on_manual_upgrade: true,
    roll_instances_when_required: true,
    scale_to_zero_before_deletion: true,
});

feature_group!(ResourceGroupFeatures {
    prevent_deletion_if_contains_resources: true,
});

feature_group!(RecoveryServicesVaultFeatures {
    recover_soft_deleted_backup_protected_vm: true,
});

feature_group!(StorageFeatures {
    data_plane_available: true,
});

feature_group!(SubscriptionFeatures {
    prevent_cancellation_on_destroy: false,
});

feature_group!(PostgresqlFlexibleServerFeatures {
    restart_server_on_configuration_value_change: true,
});

feature_group!(MachineLearningFeatures {
    purge_soft_deleted_workspace_on_destroy: false,
});

feature_group!(RecoveryServiceFeatures {
    vm_backup_stop_protection_and_retain_data_on_destroy: false,
    vm_backup_suspend_protection_and_retain_data_on_destroy: false,
    purge_protected_items_from_vault_on_destroy: false,
});

feature_group!(NetAppFeatures {
    delete_backups_on_backup_vault_destroy: false,
    prevent_volume_destruction: true,
});

feature_group!(DatabricksWorkspaceFeatures {
    force_delete: false,
});

/// Resolved feature flags, one group per resource family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFeatures {
    pub api_management: ApiManagementFeatures,
    pub app_configuration: AppConfigurationFeatures,
    pub application_insights: ApplicationInsightsFeatures,
    pub cognitive_account: CognitiveAccountFeatures,
    pub key_vault: KeyVaultFeatures,
    pub log_analytics_workspace: LogAnalyticsWorkspaceFeatures,
    pub managed_disk: ManagedDiskFeatures,
    pub template_deployment: TemplateDeploymentFeatures,
    pub virtual_machine: VirtualMachineFeatures,
    pub virtual_machine_scale_set: VirtualMachineScaleSetFeatures,
    pub resource_group: ResourceGroupFeatures,
    pub recovery_services_vaults: RecoveryServicesVaultFeatures,
    pub storage: StorageFeatures,
    pub subscription: SubscriptionFeatures,
    pub postgresql_flexible_server: PostgresqlFlexibleServerFeatures,
    pub machine_learning: MachineLearningFeatures,
    pub recovery_service: RecoveryServiceFeatures,
    pub netapp: NetAppFeatures,
    pub databricks_workspace: DatabricksWorkspaceFeatures,
}

/// Whether configuration must carry a `features` block.
///
/// Only the legacy acceptance-test harness may omit it.
pub fn features_block_required(legacy_test_suite: bool) -> bool {
    !legacy_test_suite
}

/// Turn the raw `features` block into [`UserFeatures`].
///
/// `input` is the block as a list with at most one element. Missing groups,
/// `null`, and empty lists fall back to the defaults; inside a group only
/// the keys present override. Unknown groups, unknown keys and non-boolean
/// values are skipped.
pub fn expand_features(input: &[Value]) -> UserFeatures {
    let Some(Value::Object(block)) = input.first() else {
        return UserFeatures::default();
    };

    let schema = match serde_json::to_value(UserFeatures::default()) {
        Ok(Value::Object(schema)) => schema,
        _ => return UserFeatures::default(),
    };

    let mut normalized = Map::new();
    for (group, raw) in block {
        let Some(Value::Object(known)) = schema.get(group) else {
            debug!(group = %group, "ignoring unknown features block");
            continue;
        };
        let Some(Value::Object(fields)) = first_block(raw) else {
            continue;
        };

        let mut overrides = Map::new();
        for (key, value) in fields {
            match value {
                _ if !known.contains_key(key) => {
                    debug!(group = %group, key = %key, "ignoring unknown feature");
                }
                Value::Bool(_) => {
                    overrides.insert(key.clone(), value.clone());
                }
                Value::Null => {}
                other => {
                    debug!(group = %group, key = %key, value = %other, "ignoring non-boolean feature value");
                }
            }
        }
        normalized.insert(group.clone(), Value::Object(overrides));
    }

    serde_json::from_value(Value::Object(normalized)).unwrap_or_else(|e| {
        warn!(error = %e, "failed to expand features, using defaults");
        UserFeatures::default()
    })
}

fn first_block(raw: &Value) -> Option<&Value> {
    match raw {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(raw),
        _ => None,
    }
}
