//! Statistics service
//!
//! Thin glue between the record store and the pure aggregators: loads
//! the record set and hands it to the stats functions. Views are cheap
//! enough to recompute on every read, so nothing is cached.

use crate::database::Repository;
use crate::error::Result;
use crate::stats::{
    location_stats, overall_stats, size_distribution, species_stats, time_analysis,
    weather_stats, LocationStats, OverallStats, SizeDistribution, SpeciesStats, TimeAnalysis,
    WeatherStats,
};

/// Service computing aggregate views over the record set
#[derive(Clone)]
pub struct StatsService {
    repo: Repository,
}

impl StatsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn overall(&self) -> Result<OverallStats> {
        let records = self.repo.list_records().await?;
        Ok(overall_stats(&records))
    }

    pub async fn time_analysis(&self) -> Result<TimeAnalysis> {
        let records = self.repo.list_records().await?;
        Ok(time_analysis(&records))
    }

    pub async fn size_distribution(&self) -> Result<SizeDistribution> {
        let records = self.repo.list_records().await?;
        Ok(size_distribution(&records))
    }

    pub async fn by_species(&self) -> Result<Vec<SpeciesStats>> {
        let records = self.repo.list_records().await?;
        Ok(species_stats(&records))
    }

    pub async fn by_location(&self) -> Result<Vec<LocationStats>> {
        let records = self.repo.list_records().await?;
        Ok(location_stats(&records))
    }

    pub async fn by_weather(&self) -> Result<Vec<WeatherStats>> {
        let records = self.repo.list_records().await?;
        Ok(weather_stats(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, RecordDraft};
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> (StatsService, Repository) {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let repo = Repository::new(pool);
        (StatsService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_views_over_stored_records() {
        let (service, repo) = create_test_service().await;

        for (species, size) in [("Sea bass", 40.0), ("Sea bass", 60.0), ("Mackerel", 25.0)] {
            let draft = RecordDraft {
                caught_at: Some(Utc::now()),
                location: Some("Pier".to_string()),
                species: Some(species.to_string()),
                size_cm: Some(size),
                ..Default::default()
            };
            repo.create_record(&draft).await.unwrap();
        }

        let overall = service.overall().await.unwrap();
        assert_eq!(overall.total_records, 3);
        assert_eq!(overall.unique_species, 2);

        let by_species = service.by_species().await.unwrap();
        assert_eq!(by_species[0].species, "Sea bass");
        assert_eq!(by_species[0].count, 2);

        let dist = service.size_distribution().await.unwrap();
        assert_eq!(dist.ranges.len(), 10);
    }

    #[tokio::test]
    async fn test_views_over_empty_store() {
        let (service, _repo) = create_test_service().await;

        assert_eq!(service.overall().await.unwrap().total_records, 0);
        assert!(service.size_distribution().await.unwrap().ranges.is_empty());
        assert!(service.by_weather().await.unwrap().is_empty());
    }
}
