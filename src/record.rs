//! 속성 값 인코딩 모듈
//!
//! CSV 셀을 DynamoDB 형식의 태그된 속성 값으로 분류하고,
//! 헤더와 데이터 행을 짝지어 JSON 레코드로 조립합니다.

use csv::StringRecord;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::RaggedPolicy;
use crate::error::{CjConvertError, Result};

/// 태그된 속성 값
///
/// 숫자로만 이루어진 셀은 `{"N": "..."}`, 그 외에는 `{"S": "..."}`로
/// 직렬화됩니다. 숫자 텍스트는 파싱하지 않고 원문 그대로 보존합니다
/// (앞자리 0 유지).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeValue {
    /// 십진 숫자 텍스트 원문 (예: "007")
    #[serde(rename = "N")]
    Number(String),
    /// 문자열 텍스트 (겉의 큰따옴표 한 겹 제거)
    #[serde(rename = "S")]
    Text(String),
}

/// 셀 원문을 속성 값으로 분류
///
/// 셀 전체가 ASCII 십진 숫자(`0-9`)면 `Number`, 아니면 `Text`입니다.
/// 빈 셀은 숫자가 아니므로 `Text("")`가 됩니다.
pub fn classify_cell(raw: &str) -> AttributeValue {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        AttributeValue::Number(raw.to_string())
    } else {
        AttributeValue::Text(strip_one_quote_layer(raw).to_string())
    }
}

/// 겉을 감싼 큰따옴표를 정확히 한 겹만 제거
///
/// 일반적인 이스케이프 해제는 하지 않습니다.
pub fn strip_one_quote_layer(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// 헤더와 데이터 행을 짝지어 JSON 레코드 생성
///
/// 키 순서는 헤더 순서를 따르고, 중복된 헤더 이름은 먼저 들어간 키의
/// 자리를 유지한 채 값만 덮어씁니다. 헤더 이름은 양쪽 공백을 제거하며
/// 셀 원문은 건드리지 않습니다. 셀 수가 헤더와 다를 때의 동작은
/// `policy`가 결정합니다.
pub fn build_record(
    headers: &StringRecord,
    row: &StringRecord,
    row_number: usize,
    policy: RaggedPolicy,
) -> Result<Map<String, Value>> {
    if policy == RaggedPolicy::Strict && row.len() != headers.len() {
        return Err(CjConvertError::RaggedRow {
            row: row_number,
            expected: headers.len(),
            found: row.len(),
        });
    }

    let mut record = Map::new();
    for (index, header) in headers.iter().enumerate() {
        let raw = match row.get(index) {
            Some(cell) => cell,
            // Pad: 모자란 셀을 빈 문자열로, Truncate: 짧은 행은 여기서 끝
            None if policy == RaggedPolicy::Pad => "",
            None => break,
        };
        let value = serde_json::to_value(classify_cell(raw)).map_err(|e| {
            CjConvertError::SerializeError {
                reason: e.to_string(),
            }
        })?;
        record.insert(header.trim().to_string(), value);
    }

    Ok(record)
}
