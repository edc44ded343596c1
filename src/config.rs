/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 批改 API 基础地址
    pub api_base_url: String,
    /// 批量批改的最大并发请求数
    pub max_concurrent_gradings: usize,
    /// 对比模式单次最多处理的题目数量
    pub comparison_question_limit: usize,
    /// 题目 JSON 文件存放目录
    pub questions_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否运行接口对比模式（标准接口 vs compact 接口）
    pub comparison_mode: bool,
    /// 忽略维度列表的持久化文件
    pub ignored_dimensions_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            max_concurrent_gradings: 8,
            comparison_question_limit: 6,
            questions_folder: "questions_json".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            comparison_mode: false,
            ignored_dimensions_file: "ignored_dimensions.json".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            max_concurrent_gradings: std::env::var("MAX_CONCURRENT_GRADINGS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_gradings),
            comparison_question_limit: std::env::var("COMPARISON_QUESTION_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.comparison_question_limit),
            questions_folder: std::env::var("QUESTIONS_FOLDER").unwrap_or(default.questions_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            comparison_mode: std::env::var("COMPARISON_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.comparison_mode),
            ignored_dimensions_file: std::env::var("IGNORED_DIMENSIONS_FILE").unwrap_or(default.ignored_dimensions_file),
        }
    }
}
