//! Mock pipeline 客户端
//!
//! 用于单元测试的 mock 实现，在内存中记录提交，支持注入失败场景。

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use tracing::instrument;

use crate::client::{JobHandle, PipelineClient};
use crate::error::{Result, SubmitError};
use crate::run::PipelineRun;

/// Mock pipeline 客户端
#[derive(Debug, Default)]
pub struct MockPipelineClient {
    /// 设置后所有提交都以此信息失败
    fail_with: Option<String>,
    next_job_id: AtomicU32,
    submissions: Mutex<Vec<PipelineRun>>,
}

impl MockPipelineClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 拒绝所有提交的客户端
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    /// 已接受的提交
    pub fn submissions(&self) -> Vec<PipelineRun> {
        self.submissions.lock().unwrap().clone()
    }
}

impl PipelineClient for MockPipelineClient {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(name = "mock_pipeline_submit", skip(self, run), fields(display_name = %run.display_name()))]
    async fn submit(&self, run: &PipelineRun) -> Result<JobHandle> {
        if let Some(ref message) = self.fail_with {
            return Err(SubmitError::Rejected {
                status: 500,
                body: message.clone(),
            });
        }

        let id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        self.submissions.lock().unwrap().push(run.clone());
        Ok(JobHandle {
            resource_name: format!("mock/pipelineJobs/{id}"),
            display_name: run.display_name().to_string(),
            state: Some("PIPELINE_STATE_PENDING".to_string()),
        })
    }
}
