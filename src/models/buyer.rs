use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Who is taking title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Personal,
    Llc,
}

impl BuyerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuyerType::Personal => "personal",
            BuyerType::Llc => "llc",
        }
    }
}

/// How the purchase is funded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingType {
    Cash,
    HardMoney,
}

impl FundingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingType::Cash => "cash",
            FundingType::HardMoney => "hard_money",
        }
    }
}

/// Buyer questionnaire from the first Ready to Buy step.
///
/// Buyer and funding type start unselected; which other fields are required
/// depends on what gets selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyerInfo {
    pub buyer_type: Option<BuyerType>,
    pub funding_type: Option<FundingType>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Vesting address for personal purchases
    pub mailing_address: String,
    pub entity_name: String,
    pub entity_state: String,
    pub signer_title: String,
    pub lender_name: String,
    pub lender_email: String,
    pub proof_of_funds_note: String,
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

impl BuyerInfo {
    /// Every problem with the questionnaire, in form order
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut require = |value: &str, label: &str| {
            if value.trim().is_empty() {
                errors.push(format!("{} is required", label));
            }
        };

        require(&self.first_name, "First name");
        require(&self.last_name, "Last name");
        require(&self.email, "Email");
        require(&self.phone, "Phone");

        match self.buyer_type {
            Some(BuyerType::Personal) => {
                require(&self.mailing_address, "Mailing address");
            }
            Some(BuyerType::Llc) => {
                require(&self.entity_name, "LLC name");
                require(&self.entity_state, "LLC formation state");
                require(&self.signer_title, "Signer title");
            }
            None => {}
        }

        if self.funding_type == Some(FundingType::HardMoney) {
            require(&self.lender_name, "Lender name");
            require(&self.lender_email, "Lender email");
        }

        if self.buyer_type.is_none() {
            errors.push("Buyer type must be selected".to_string());
        }
        if self.funding_type.is_none() {
            errors.push("Funding type must be selected".to_string());
        }

        if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
            errors.push("Email is invalid".to_string());
        }
        if self.funding_type == Some(FundingType::HardMoney)
            && !self.lender_email.trim().is_empty()
            && !looks_like_email(&self.lender_email)
        {
            errors.push("Lender email is invalid".to_string());
        }

        errors
    }

    /// Validate the questionnaire
    pub fn validate(&self) -> AppResult<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors.join("; ")))
        }
    }

    pub fn is_complete(&self) -> bool {
        self.validation_errors().is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal_cash() -> BuyerInfo {
        BuyerInfo {
            buyer_type: Some(BuyerType::Personal),
            funding_type: Some(FundingType::Cash),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@example.com".to_string(),
            phone: "214-555-0100".to_string(),
            mailing_address: "10 Main St, Dallas, TX".to_string(),
            ..BuyerInfo::default()
        }
    }

    #[test]
    fn test_personal_cash_is_complete() {
        assert!(personal_cash().is_complete());
        assert!(personal_cash().validate().is_ok());
    }

    #[test]
    fn test_empty_form_lists_selections() {
        let errors = BuyerInfo::default().validation_errors();
        assert!(errors.contains(&"Buyer type must be selected".to_string()));
        assert!(errors.contains(&"Funding type must be selected".to_string()));
        assert!(errors.contains(&"Email is required".to_string()));
    }

    #[test]
    fn test_llc_requires_entity_fields() {
        let info = BuyerInfo {
            buyer_type: Some(BuyerType::Llc),
            ..personal_cash()
        };
        let errors = info.validation_errors();
        assert_eq!(
            errors,
            vec![
                "LLC name is required".to_string(),
                "LLC formation state is required".to_string(),
                "Signer title is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_hard_money_requires_lender() {
        let mut info = BuyerInfo {
            funding_type: Some(FundingType::HardMoney),
            ..personal_cash()
        };
        assert!(!info.is_complete());

        info.lender_name = "Lone Star Capital".to_string();
        info.lender_email = "loans@lonestar".to_string();
        assert_eq!(info.validation_errors(), vec!["Lender email is invalid".to_string()]);

        info.lender_email = "loans@lonestar.com".to_string();
        assert!(info.is_complete());
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.co"));
        assert!(!looks_like_email("a@.co"));
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let info: BuyerInfo = serde_json::from_str(r#"{"buyer_type":"llc"}"#).unwrap();
        assert_eq!(info.buyer_type, Some(BuyerType::Llc));
        assert_eq!(info.funding_type, None);
    }
}
