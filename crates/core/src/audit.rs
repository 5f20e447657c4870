//! Closed taxonomy of auditable administrative actions.
//!
//! Every mutating endpoint records exactly one entry in `historico_acoes`
//! tagged with one of these kinds. The set is closed: extend only by
//! adding variants (entries are append-only, so existing wire strings
//! must never change meaning).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Kind of administrative action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    RegisterEmployee,
    UpdateEmployee,
    DeleteEmployee,
    DeactivateEmployee,
    AnonymizeEmployee,
    UpdateGeneralInfo,
    RegisterPurchase,
    RegisterClient,
    UpdateClient,
    DeleteClient,
    AnonymizeClient,
}

impl ActionKind {
    /// The stable wire/storage string for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::RegisterEmployee => "register_employee",
            ActionKind::UpdateEmployee => "update_employee",
            ActionKind::DeleteEmployee => "delete_employee",
            ActionKind::DeactivateEmployee => "deactivate_employee",
            ActionKind::AnonymizeEmployee => "anonymize_employee",
            ActionKind::UpdateGeneralInfo => "update_general_info",
            ActionKind::RegisterPurchase => "register_purchase",
            ActionKind::RegisterClient => "register_client",
            ActionKind::UpdateClient => "update_client",
            ActionKind::DeleteClient => "delete_client",
            ActionKind::AnonymizeClient => "anonymize_client",
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register_employee" => Ok(ActionKind::RegisterEmployee),
            "update_employee" => Ok(ActionKind::UpdateEmployee),
            "delete_employee" => Ok(ActionKind::DeleteEmployee),
            "deactivate_employee" => Ok(ActionKind::DeactivateEmployee),
            "anonymize_employee" => Ok(ActionKind::AnonymizeEmployee),
            "update_general_info" => Ok(ActionKind::UpdateGeneralInfo),
            "register_purchase" => Ok(ActionKind::RegisterPurchase),
            "register_client" => Ok(ActionKind::RegisterClient),
            "update_client" => Ok(ActionKind::UpdateClient),
            "delete_client" => Ok(ActionKind::DeleteClient),
            "anonymize_client" => Ok(ActionKind::AnonymizeClient),
            other => Err(CoreError::Validation(format!(
                "Tipo de ação desconhecido: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
