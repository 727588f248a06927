use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::{
    body,
    requests::{
        EsewaCheckoutRequest, EsewaStatusRequest, EsewaVerifyRequest, FlexibleAmount,
        KhaltiInitiateRequest, KhaltiLookupRequest, KhaltiVerifyRequest,
    },
    responses::{EsewaCheckoutPayload, EsewaCheckoutResponse, EsewaVerifyResponse, KhaltiVerifyResponse},
};
use crate::domain::models::payment::to_paisa;
use crate::domain::ports::EsewaVerification;
use crate::domain::services::esewa;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn present_amount(value: &Option<FlexibleAmount>) -> Option<&FlexibleAmount> {
    value.as_ref().filter(|a| !a.is_absent())
}

pub async fn khalti_verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KhaltiVerifyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;
    let (Some(token), Some(amount)) = (present(&payload.token), present_amount(&payload.amount)) else {
        return Err(AppError::Validation("Token and amount are required for Khalti verification".into()));
    };
    let amount = amount.as_f64()
        .ok_or(AppError::Validation("amount must be a number".into()))?;

    let details = state.khalti.verify(token, to_paisa(amount)).await
        .map_err(|e| AppError::from_gateway(e, Some(StatusCode::PAYMENT_REQUIRED), "Khalti payment could not be verified"))?;

    let reference = details.get("idx")
        .and_then(Value::as_str)
        .filter(|idx| !idx.is_empty())
        .unwrap_or(token)
        .to_string();

    info!("Khalti payment {} verified", reference);
    Ok(Json(KhaltiVerifyResponse { success: true, reference, details }))
}

pub async fn khalti_initiate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KhaltiInitiateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;

    let required = (
        present_amount(&payload.amount),
        present(&payload.purchase_order_id),
        present(&payload.purchase_order_name),
        present(&payload.return_url),
        present(&payload.website_url),
    );
    let (Some(amount), Some(order_id), Some(order_name), Some(return_url), Some(website_url)) = required else {
        return Err(AppError::Validation(
            "amount, purchase_order_id, purchase_order_name, return_url, and website_url are required".into(),
        ));
    };

    let paisa = amount.as_f64().map(to_paisa).filter(|p| *p > 0)
        .ok_or(AppError::Validation("amount must be a positive number".into()))?;

    let mut request = Map::new();
    request.insert("return_url".into(), return_url.into());
    request.insert("website_url".into(), website_url.into());
    request.insert("amount".into(), paisa.into());
    request.insert("purchase_order_id".into(), order_id.into());
    request.insert("purchase_order_name".into(), order_name.into());

    let optional = [
        ("failure_url", payload.failure_url.map(Value::String)),
        ("customer_info", payload.customer_info),
        ("amount_breakdown", payload.amount_breakdown),
        ("product_details", payload.product_details),
        ("merchant_username", payload.merchant_username.map(Value::String)),
        ("merchant_extra", payload.merchant_extra.map(Value::String)),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(is_truthy) {
            request.insert(key.into(), value);
        }
    }

    let response = state.khalti.initiate(&Value::Object(request)).await
        .map_err(|e| AppError::from_gateway(e, None, "Unable to initiate Khalti payment"))?;

    Ok(Json(response))
}

/// Empty strings and nulls count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub async fn khalti_lookup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KhaltiLookupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;
    let pidx = present(&payload.pidx)
        .ok_or(AppError::Validation("pidx is required to lookup Khalti payment".into()))?;

    let response = state.khalti.lookup(pidx).await
        .map_err(|e| AppError::from_gateway(e, None, "Unable to lookup Khalti payment"))?;

    Ok(Json(response))
}

pub async fn esewa_verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EsewaVerifyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;
    let (Some(pid), Some(amt), Some(ref_id)) = (present(&payload.pid), present_amount(&payload.amt), present(&payload.ref_id)) else {
        return Err(AppError::Validation("pid, amt and refId are required for eSewa verification".into()));
    };
    let amount = amt.as_f64()
        .ok_or(AppError::Validation("amt must be a number".into()))?;

    let request = EsewaVerification {
        pid: pid.to_string(),
        amount,
        reference_id: ref_id.to_string(),
    };
    let raw = state.esewa.verify(&request).await
        .map_err(|e| AppError::from_gateway(e, Some(StatusCode::PAYMENT_REQUIRED), "eSewa payment could not be verified"))?;

    if !esewa::transaction_succeeded(&raw) {
        return Err(AppError::Upstream {
            status: StatusCode::PAYMENT_REQUIRED,
            message: "eSewa reported a failed transaction".into(),
            details: Value::String(raw),
        });
    }

    info!("eSewa payment {} verified for {}", ref_id, pid);
    Ok(Json(EsewaVerifyResponse { success: true, reference: ref_id.to_string(), raw }))
}

pub async fn esewa_checkout(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EsewaCheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;
    let required = (
        present(&payload.pid),
        present_amount(&payload.amount),
        present_amount(&payload.total_amount),
        present(&payload.product_code),
    );
    let (Some(pid), Some(amount), Some(total_amount), Some(product_code)) = required else {
        return Err(AppError::Validation("pid, amount, total_amount and product_code are required".into()));
    };

    let total_amount = total_amount.as_text();
    let signature = state.esewa.sign_checkout(&total_amount, pid, product_code)
        .map_err(|e| AppError::from_gateway(e, None, "Unable to sign eSewa checkout"))?;

    let tax_amount = present_amount(&payload.tax_amount)
        .map(FlexibleAmount::as_text)
        .unwrap_or_else(|| "0".to_string());

    Ok(Json(EsewaCheckoutResponse {
        signature,
        signed_field_names: esewa::SIGNED_FIELD_NAMES,
        payload: EsewaCheckoutPayload {
            amount: amount.as_text(),
            tax_amount,
            total_amount,
            transaction_uuid: pid.to_string(),
            product_code: product_code.to_string(),
        },
    }))
}

pub async fn esewa_status(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EsewaStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = body(payload)?;
    let required = (
        present(&payload.product_code),
        present_amount(&payload.total_amount),
        present(&payload.transaction_uuid),
    );
    let (Some(product_code), Some(total_amount), Some(transaction_uuid)) = required else {
        return Err(AppError::Validation("product_code, total_amount, transaction_uuid are required".into()));
    };

    let response = state.esewa.status(product_code, &total_amount.as_text(), transaction_uuid).await
        .map_err(|e| AppError::from_gateway(e, Some(StatusCode::INTERNAL_SERVER_ERROR), "Unable to fetch eSewa transaction status"))?;

    Ok(Json(response))
}
