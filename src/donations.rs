/// Donation records and the donation submission flow
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::list::Resource;
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DONATIONS_PATH: &str = "/api/donations";
pub const DONATION_ADD_PATH: &str = "/api/donations/add";

/// How a donation was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::BankTransfer => "Bank Transfer",
        }
    }
}

/// A recorded donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(alias = "_id")]
    pub id: String,
    pub full_name: String,
    pub mobile_number: u64,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_utr_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// In-progress copy of a donation; numeric fields hold the entered text
#[derive(Debug, Clone, PartialEq)]
pub struct DonationDraft {
    pub full_name: String,
    pub mobile_number: String,
    pub amount: String,
    pub payment_mode: PaymentMode,
    pub upi_utr_number: String,
    pub address: String,
}

/// Payload for creating or updating a donation: the full record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub full_name: String,
    pub mobile_number: u64,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_utr_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewDonation {
    /// Build a validated donation from raw form input.
    ///
    /// The UTR number is meaningful only for UPI payments and is dropped for
    /// the other payment modes.
    pub fn from_input(
        full_name: &str,
        mobile_number: &str,
        amount: &str,
        payment_mode: PaymentMode,
        upi_utr_number: &str,
        address: &str,
    ) -> ClientResult<Self> {
        validation::require_non_empty("fullName", full_name)?;
        let mobile_number = validation::parse_mobile_number(mobile_number)?;
        let amount = validation::parse_amount(amount)?;

        let upi_utr_number = match payment_mode {
            PaymentMode::Upi if !upi_utr_number.trim().is_empty() => {
                Some(upi_utr_number.trim().to_string())
            }
            _ => None,
        };
        let address = if address.trim().is_empty() {
            None
        } else {
            Some(address.trim().to_string())
        };

        Ok(Self {
            full_name: full_name.trim().to_string(),
            mobile_number,
            amount,
            payment_mode,
            upi_utr_number,
            address,
        })
    }
}

impl Resource for Donation {
    type Draft = DonationDraft;
    type Create = NewDonation;
    type Update = NewDonation;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.full_name
    }

    fn collection_path() -> &'static str {
        DONATIONS_PATH
    }

    fn create_path() -> &'static str {
        DONATION_ADD_PATH
    }

    fn noun() -> &'static str {
        "donation"
    }

    fn to_draft(&self) -> DonationDraft {
        DonationDraft {
            full_name: self.full_name.clone(),
            mobile_number: self.mobile_number.to_string(),
            amount: self.amount.to_string(),
            payment_mode: self.payment_mode,
            upi_utr_number: self.upi_utr_number.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
        }
    }

    fn update_from_draft(draft: &DonationDraft) -> ClientResult<NewDonation> {
        NewDonation::from_input(
            &draft.full_name,
            &draft.mobile_number,
            &draft.amount,
            draft.payment_mode,
            &draft.upi_utr_number,
            &draft.address,
        )
    }

    fn merged_with(&self, update: &NewDonation) -> Self {
        Self {
            id: self.id.clone(),
            full_name: update.full_name.clone(),
            mobile_number: update.mobile_number,
            amount: update.amount,
            payment_mode: update.payment_mode,
            upi_utr_number: update.upi_utr_number.clone(),
            address: update.address.clone(),
            created_at: self.created_at,
        }
    }

    fn validate_create(create: &NewDonation) -> ClientResult<()> {
        validation::require_non_empty("fullName", &create.full_name)?;
        validation::validate_mobile_value(create.mobile_number)?;
        validation::validate_amount_value(create.amount)?;
        Ok(())
    }
}

/// Submit a donation from the standalone donation form.
///
/// Validation runs before the request is built, so invalid input never
/// reaches the network.
pub async fn submit(api: &ApiClient, donation: &NewDonation) -> ClientResult<()> {
    Donation::validate_create(donation)?;
    api.post_unit(DONATION_ADD_PATH, donation).await?;
    info!(amount = donation.amount, "Donation recorded");
    Ok(())
}
