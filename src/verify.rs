//! Contract verification form.
//!
//! Submissions are accepted and echoed back onto the contract tab. Nothing is
//! compiled or compared against on-chain bytecode.

use serde::{Deserialize, Serialize};

pub const DEMO_NOTICE: &str =
    "Contract verification submitted! This is a demo - in production, this would compile and verify the contract.";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationRequest {
    pub contract_name: String,
    pub compiler: String,
    pub optimization: bool,
    pub source_code: String,
    pub constructor_args: String,
}

impl VerificationRequest {
    /// Build from raw form values; the optimization select posts `"true"`/`"false"`.
    pub fn from_form(
        contract_name: &str,
        compiler: &str,
        optimization: &str,
        source_code: &str,
        constructor_args: &str,
    ) -> Self {
        VerificationRequest {
            contract_name: contract_name.trim().to_string(),
            compiler: compiler.trim().to_string(),
            optimization: optimization.trim().eq_ignore_ascii_case("true"),
            source_code: source_code.to_string(),
            constructor_args: constructor_args.trim().to_string(),
        }
    }
}

/// What the contract tab shows after a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifiedContract {
    pub name: String,
    pub compiler: String,
    pub optimization: bool,
    pub source_code: String,
}

impl VerifiedContract {
    pub fn optimization_label(&self) -> &'static str {
        if self.optimization {
            "Yes"
        } else {
            "No"
        }
    }
}

pub fn submit(request: &VerificationRequest) -> VerifiedContract {
    log::info!(
        "📝 verification submitted for {:?} ({}, optimization={}, {} bytes of source)",
        request.contract_name,
        request.compiler,
        request.optimization,
        request.source_code.len()
    );
    VerifiedContract {
        name: request.contract_name.clone(),
        compiler: request.compiler.clone(),
        optimization: request.optimization,
        source_code: request.source_code.clone(),
    }
}
