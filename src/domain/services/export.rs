// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::models::job::Job;
use crate::domain::models::tag::Tag;

const CSV_HEADER: [&str; 5] = ["ExtractedText", "ScrapedAt", "JobUrl", "CssSelector", "JobId"];
const CSV_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 导出文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// 生成导出文件名，例如 `scraping_job_7_results_20250101_120000.csv`
pub fn export_file_name(job_id: i64, format: ExportFormat, at: DateTime<Utc>) -> String {
    format!(
        "scraping_job_{}_results_{}.{}",
        job_id,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// 导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// 换行和制表符替换为空格，保证每条结果只占一行
pub fn flatten_line_breaks(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}

/// 将任务结果导出为CSV，结果按发现顺序排列
///
/// 所有字段都加引号，内部引号由 `csv` 加倍
pub fn to_csv(job: &Job) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(64 * (job.results.len() + 1)));

    writer.write_record(CSV_HEADER)?;

    let url = flatten_line_breaks(&job.target_url);
    let selector = flatten_line_breaks(&job.css_selector);
    let job_id = job.id.to_string();
    for result in &job.results {
        let scraped_at = result.scraped_at.format(CSV_TIME_FORMAT).to_string();
        writer.write_record([
            flatten_line_breaks(&result.extracted_text).as_str(),
            scraped_at.as_str(),
            url.as_str(),
            selector.as_str(),
            job_id.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

#[derive(Debug, Serialize)]
pub struct JsonExport<'a> {
    pub job: JsonExportJob<'a>,
    pub results: Vec<JsonExportResult<'a>>,
    pub metadata: JsonExportMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct JsonExportJob<'a> {
    pub id: i64,
    pub target_url: &'a str,
    pub css_selector: &'a str,
    pub created_at: DateTime<Utc>,
    pub owner: Option<&'a str>,
    pub tags: &'a [Tag],
}

#[derive(Debug, Serialize)]
pub struct JsonExportResult<'a> {
    pub extracted_text: &'a str,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct JsonExportMetadata<'a> {
    pub exported_at: DateTime<Utc>,
    pub total_results: usize,
    pub exported_by: &'a str,
}

/// 构造JSON导出文档
pub fn to_json_export<'a>(
    job: &'a Job,
    exported_by: &'a str,
    exported_at: DateTime<Utc>,
) -> JsonExport<'a> {
    JsonExport {
        job: JsonExportJob {
            id: job.id,
            target_url: &job.target_url,
            css_selector: &job.css_selector,
            created_at: job.created_at,
            owner: job.owner_name.as_deref(),
            tags: &job.tags,
        },
        results: job
            .results
            .iter()
            .map(|r| JsonExportResult {
                extracted_text: &r.extracted_text,
                scraped_at: r.scraped_at,
            })
            .collect(),
        metadata: JsonExportMetadata {
            exported_at,
            total_results: job.results.len(),
            exported_by,
        },
    }
}
