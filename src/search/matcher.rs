//! 短语匹配规则，简单实现

/// 对目标短语做大小写不敏感的子串匹配。
///
/// 同时接受原短语和去掉所有空格后的短语，因此 "My Show" 也能命中 "myshow"。
/// 这是纯子串匹配，不检查词边界：短语 "My Show" 同样会命中 "my showtime"。
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrase: String,
    compact: String,
}

impl PhraseMatcher {
    /// 为给定短语创建匹配器。
    pub fn new(phrase: &str) -> Self {
        let phrase = phrase.to_lowercase();
        let compact = phrase.replace(' ', "");
        Self { phrase, compact }
    }

    /// 文本中是否出现了目标短语。
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        text.contains(&self.phrase) || text.contains(&self.compact)
    }

    /// 任意一段文本中是否出现了目标短语。
    ///
    /// 每段文本单独匹配，不会因为拼接而跨段命中。
    pub fn matches_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| self.matches(text))
    }
}
