/// Dashboard aggregates, the recent-donations feed, and spreadsheet export
use crate::api::ApiClient;
use crate::donations::Donation;
use crate::error::ClientResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const STATS_PATH: &str = "/api/dashboard/stats";
pub const RECENT_PATH: &str = "/api/report/recent";
pub const EXPORT_PATH: &str = "/api/report/export";

/// File name the spreadsheet export is saved under
pub const EXPORT_FILE_NAME: &str = "mandal_donations.xlsx";

/// Aggregate totals shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_collection: f64,
    pub total_donors: u64,
    pub today_collection: f64,
    pub today_donors: u64,
}

/// Read-side service behind the dashboard screen
pub struct DashboardService {
    api: Arc<ApiClient>,
}

impl DashboardService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Aggregate totals
    pub async fn stats(&self) -> ClientResult<DashboardStats> {
        self.api.get_json(STATS_PATH).await
    }

    /// Most recent donations
    pub async fn recent_donations(&self) -> ClientResult<Vec<Donation>> {
        self.api.get_json(RECENT_PATH).await
    }

    /// Raw spreadsheet export from the backend
    pub async fn export_spreadsheet(&self) -> ClientResult<Vec<u8>> {
        self.api.get_bytes(EXPORT_PATH).await
    }

    /// Fetch the spreadsheet export and save it into a directory
    pub async fn export_to(&self, directory: &Path) -> ClientResult<PathBuf> {
        let bytes = self.export_spreadsheet().await?;
        tokio::fs::create_dir_all(directory).await?;
        let target = directory.join(EXPORT_FILE_NAME);
        tokio::fs::write(&target, bytes).await?;
        info!(path = %target.display(), "Spreadsheet export saved");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_deserialize_camel_case() {
        let stats: DashboardStats = serde_json::from_str(
            r#"{
                "totalCollection": 125000.50,
                "totalDonors": 340,
                "todayCollection": 2100.0,
                "todayDonors": 7
            }"#,
        )
        .unwrap();
        assert_eq!(stats.total_donors, 340);
        assert_eq!(stats.today_collection, 2100.0);
    }
}
