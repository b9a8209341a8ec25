//! 通用工具函数

use chrono::NaiveDate;
use uuid::Uuid;

/// 日期格式 (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 生成服务端记录标识符
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// 解析 YYYY-MM-DD 格式的日期
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// 验证日期字符串
pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// 将表单中以逗号分隔的诊断代码文本拆分为代码列表
///
/// 空白片段会被丢弃，所以空输入得到空列表。
pub fn split_diagnosis_codes(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// 将代码列表还原为表单文本
pub fn join_diagnosis_codes(codes: &[String]) -> String {
    codes.join(", ")
}

/// 解析文本开头的十进制整数，忽略其后的字符
///
/// `"2abc"` 和 `"1.5"` 分别得到 2 和 1；没有前导数字时返回 `None`。
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
