use crate::core::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pipeline: String,
    pub tables: usize,
    pub skipped: usize,
    pub files: Vec<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let name = self.pipeline.name().to_string();
        tracing::info!("Starting {} phase", name);

        // Extract
        tracing::debug!("{}: extracting", name);
        let raw_data = self.pipeline.extract().await?;

        // Transform
        tracing::debug!("{}: transforming", name);
        let transformed = self.pipeline.transform(raw_data).await?;
        let tables = transformed.tables.len();
        let skipped = transformed.skipped;
        tracing::info!("{}: built {} tables, skipped {} responses", name, tables, skipped);

        // Load
        tracing::debug!("{}: loading", name);
        let files = self.pipeline.load(transformed).await?;
        tracing::info!("{}: wrote {} files", name, files.len());

        Ok(RunSummary {
            pipeline: name,
            tables,
            skipped,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Table, TransformResult};

    struct FixedPipeline {
        tables: usize,
    }

    #[async_trait::async_trait]
    impl Pipeline for FixedPipeline {
        type Extracted = usize;

        fn name(&self) -> &str {
            "fixed"
        }

        async fn extract(&self) -> Result<usize> {
            Ok(self.tables)
        }

        async fn transform(&self, data: usize) -> Result<TransformResult> {
            Ok(TransformResult {
                tables: vec![Table::new(); data],
                skipped: 1,
            })
        }

        async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
            Ok((0..result.tables.len()).map(|i| format!("fixed_{}.csv", i)).collect())
        }
    }

    #[tokio::test]
    async fn test_run_reports_each_stage() {
        let engine = EtlEngine::new(FixedPipeline { tables: 2 });

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.pipeline, "fixed");
        assert_eq!(summary.tables, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files, vec!["fixed_0.csv", "fixed_1.csv"]);
    }
}
