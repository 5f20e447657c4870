//! Handlers for the `/compra` resource.

use axum::extract::{Multipart, State};
use axum::Json;
use ru_core::audit::ActionKind;
use ru_core::error::CoreError;
use ru_core::types::{DbId, Timestamp};
use ru_db::models::purchase::{NewPurchase, Purchase};
use ru_db::repositories::{AuditRepo, ClientRepo, GeneralInfoRepo, PurchaseRepo};
use serde::Deserialize;
use serde_json::json;

use crate::csv_import;
use crate::error::{AppError, AppResult};
use crate::handlers::funcionario::read_csv_upload;
use crate::middleware::rbac::RequireStaff;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Columns the bulk-import CSV must carry.
const CSV_COLUMNS: &[&str] = &["usuario_id", "horario", "local", "forma_pagamento", "preco"];

/// The closed set of payment methods.
const FORMAS_PAGAMENTO: &[&str] = &["credito", "debito", "pix", "dinheiro"];

/// Request body for `POST /compra/cadastra-compra`, also the CSV row
/// shape.
#[derive(Debug, Deserialize)]
pub struct RegisterCompra {
    pub usuario_id: DbId,
    pub horario: Timestamp,
    pub local: String,
    pub forma_pagamento: String,
    /// Price in centavos.
    pub preco: i32,
}

/// POST /compra/cadastra-compra
///
/// Register a purchase for an existing client. The purchase time must
/// fall inside the configured lunch or dinner window.
pub async fn register(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Json(input): Json<RegisterCompra>,
) -> AppResult<Json<MessageResponse>> {
    create_purchase(&state, &user.cpf, &input).await?;
    Ok(Json(MessageResponse::new("Compra cadastrada com sucesso")))
}

/// Shared creation path for the JSON endpoint and each CSV row.
async fn create_purchase(
    state: &AppState,
    actor_cpf: &str,
    input: &RegisterCompra,
) -> Result<Purchase, AppError> {
    if !FORMAS_PAGAMENTO.contains(&input.forma_pagamento.as_str()) {
        return Err(AppError::Core(CoreError::Validation(
            "Forma de pagamento inválida".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;

    let client = ClientRepo::find_by_id(&mut *tx, input.usuario_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Cliente não encontrado".into()))?;

    let info = GeneralInfoRepo::get(&mut *tx)
        .await?
        .ok_or_else(|| AppError::BadRequest("Períodos de refeição não configurados".into()))?;

    // Wall-clock comparison: the service windows are stored as naive
    // times and the purchase timestamp is taken at face value.
    if !info.within_meal_window(input.horario.time()) {
        return Err(AppError::BadRequest(
            "Compra fora dos períodos de refeição".into(),
        ));
    }

    let created = PurchaseRepo::create(
        &mut tx,
        &NewPurchase {
            usuario_id: client.id,
            horario: input.horario,
            local: input.local.clone(),
            forma_pagamento: input.forma_pagamento.clone(),
            preco: input.preco,
        },
    )
    .await?;

    AuditRepo::record(
        &mut tx,
        actor_cpf,
        ActionKind::RegisterPurchase,
        Some(client.id),
        Some(json!({
            "compra_id": created.id,
            "horario": created.horario,
            "local": created.local,
            "forma_pagamento": created.forma_pagamento,
            "preco": created.preco,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// GET /compra/retorna-compras
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> AppResult<Json<Vec<Purchase>>> {
    let purchases = PurchaseRepo::list_all(&state.pool).await?;
    Ok(Json(purchases))
}

/// POST /compra/cadastra-compra-csv
///
/// Bulk import; each row runs in its own transaction with its own
/// audit entry, failures are skipped and only successes counted.
pub async fn upload_csv(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let bytes = read_csv_upload(&mut multipart).await?;

    let rows = csv_import::parse_rows::<RegisterCompra>(&bytes, CSV_COLUMNS)
        .map_err(|_| AppError::BadRequest("O CSV não contém as colunas necessárias.".into()))?;

    let mut imported = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Ok(input) => match create_purchase(&state, &user.cpf, &input).await {
                Ok(_) => imported += 1,
                Err(e) => tracing::warn!(row = index + 1, error = %e, "Skipping CSV row"),
            },
            Err(e) => tracing::warn!(row = index + 1, error = %e, "Unparseable CSV row"),
        }
    }

    Ok(Json(MessageResponse::new(format!(
        "{imported} compra(s) cadastrada(s) com sucesso."
    ))))
}
