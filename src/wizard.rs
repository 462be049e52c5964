//! Ready to Buy wizard.
//!
//! A linear flow: buyer info (1), contract signature and wire upload (2),
//! confirmation (3). Passing step 2 raises a celebration overlay that has to
//! be dismissed before the confirmation shows. Nothing here is persisted; a
//! page reload is a [`ReadyToBuyWizard::reset`].

use crate::models::{BuyerInfo, ReadyToBuyData, WireUpload};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wizard position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    BuyerInfo = 1,
    ContractAndWire = 2,
    Confirmation = 3,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

/// Reasons a transition is refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("Buyer information is incomplete: {}", .0.join("; "))]
    IncompleteBuyerInfo(Vec<String>),

    #[error("A signature is required")]
    MissingSignature,

    #[error("A wire confirmation upload is required")]
    MissingWireUpload,

    #[error("Cannot {action} from step {}", .step.number())]
    InvalidTransition { step: WizardStep, action: &'static str },
}

/// Client-held state of the Ready to Buy flow
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyToBuyWizard {
    step: WizardStep,
    buyer_info: BuyerInfo,
    signature: Option<String>,
    wire_upload: Option<WireUpload>,
    celebrating: bool,
}

impl Default for ReadyToBuyWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadyToBuyWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::BuyerInfo,
            buyer_info: BuyerInfo::default(),
            signature: None,
            wire_upload: None,
            celebrating: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn buyer_info(&self) -> &BuyerInfo {
        &self.buyer_info
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn wire_upload(&self) -> Option<&WireUpload> {
        self.wire_upload.as_ref()
    }

    /// Whether the celebration overlay is showing
    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    fn expect_step(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step != step || self.celebrating {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                action,
            });
        }
        Ok(())
    }

    /// Edit the questionnaire without advancing
    pub fn update_buyer_info(&mut self, info: BuyerInfo) -> Result<(), WizardError> {
        self.expect_step(WizardStep::BuyerInfo, "edit buyer info")?;
        self.buyer_info = info;
        Ok(())
    }

    /// Step 1 -> 2. The stored info is kept even when validation fails.
    pub fn submit_buyer_info(&mut self, info: BuyerInfo) -> Result<(), WizardError> {
        self.update_buyer_info(info)?;

        let errors = self.buyer_info.validation_errors();
        if !errors.is_empty() {
            return Err(WizardError::IncompleteBuyerInfo(errors));
        }

        self.step = WizardStep::ContractAndWire;
        Ok(())
    }

    /// Step 2 -> 1, keeping everything entered so far
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::ContractAndWire, "go back")?;
        self.step = WizardStep::BuyerInfo;
        Ok(())
    }

    /// Store the signature pad output. An empty value clears it.
    pub fn set_signature(&mut self, data_url: impl Into<String>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::ContractAndWire, "sign")?;
        let data_url = data_url.into();
        self.signature = if data_url.trim().is_empty() {
            None
        } else {
            Some(data_url)
        };
        Ok(())
    }

    pub fn attach_wire_upload(&mut self, upload: WireUpload) -> Result<(), WizardError> {
        self.expect_step(WizardStep::ContractAndWire, "upload a wire confirmation")?;
        self.wire_upload = if upload.is_empty() { None } else { Some(upload) };
        Ok(())
    }

    /// Step 2 -> celebration overlay
    pub fn complete_contract(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::ContractAndWire, "complete the contract")?;

        if !self.signature.as_deref().is_some_and(is_signature_data_url) {
            return Err(WizardError::MissingSignature);
        }
        if self.wire_upload.is_none() {
            return Err(WizardError::MissingWireUpload);
        }

        self.celebrating = true;
        Ok(())
    }

    /// Celebration overlay -> step 3
    pub fn finish_celebration(&mut self) -> Result<(), WizardError> {
        if !self.celebrating {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                action: "finish the celebration",
            });
        }
        self.celebrating = false;
        self.step = WizardStep::Confirmation;
        Ok(())
    }

    /// Page reload
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The collected data, once the confirmation step is reached
    pub fn submission(&self) -> Option<ReadyToBuyData> {
        if self.step != WizardStep::Confirmation {
            return None;
        }
        Some(ReadyToBuyData {
            buyer_info: self.buyer_info.clone(),
            signature: self.signature.clone().unwrap_or_default(),
            wire_confirmation: self.wire_upload.clone(),
        })
    }

    /// Drive a fresh wizard through every step with submitted data.
    ///
    /// The server uses this to hold a submission to the same rules as the
    /// client flow.
    pub fn replay(data: &ReadyToBuyData) -> Result<Self, WizardError> {
        let mut wizard = Self::new();
        wizard.submit_buyer_info(data.buyer_info.clone())?;
        wizard.set_signature(data.signature.clone())?;
        if let Some(upload) = &data.wire_confirmation {
            wizard.attach_wire_upload(upload.clone())?;
        }
        wizard.complete_contract()?;
        wizard.finish_celebration()?;
        Ok(wizard)
    }
}

/// Signature pads hand back an inline image
fn is_signature_data_url(value: &str) -> bool {
    value
        .trim()
        .strip_prefix("data:image/")
        .is_some_and(|rest| rest.contains(',') && !rest.ends_with(','))
}
