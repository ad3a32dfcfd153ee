use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use log::debug;

/// 读取平面索引文件
///
/// 每行一条记录：`标识符,分量1,分量2,...`，没有表头，标识符中不允许出现逗号。
/// 索引文件由外部的建库工具产生，这里只负责读取。
/// 空行会被跳过；空标识符或无法解析的分量会报错并指出行号
pub fn read_index<P: AsRef<Path>>(path: P) -> Result<Vec<(String, Vec<f32>)>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open index file {}", path.display()))?;

    let mut records = vec![];
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record =
            parse_record(&line).with_context(|| format!("invalid record at line {}", lineno + 1))?;
        records.push(record);
    }

    debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// 解析一行记录
fn parse_record(line: &str) -> Result<(String, Vec<f32>)> {
    let mut fields = line.split(',');
    let id = fields.next().context("missing identifier")?.trim();
    ensure!(!id.is_empty(), "empty identifier");

    let vector = fields
        .map(|field| {
            field.trim().parse::<f32>().with_context(|| format!("invalid component {:?}", field))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((id.to_string(), vector))
}
