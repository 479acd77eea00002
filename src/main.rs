use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use leetcode_submit::models::{default_solution_path, load_solution};
use leetcode_submit::services::StdinOperator;
use leetcode_submit::utils::logging;
use leetcode_submit::{
    save_auth_interactively, ChromiumContextFactory, Config, Language, SubmissionOrchestrator,
    SubmissionRequest, SubmitError,
};

#[derive(Parser)]
#[command(name = "leetcode_submit")]
#[command(about = "通过浏览器把本地解答提交到 LeetCode", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径（默认 leetcode_submit.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 提交一道题的解答
    Submit {
        /// 题目标识，如 two-sum
        slug: String,

        /// 解答文件（默认 problems/<slug>/solution.py）
        #[arg(long)]
        solution: Option<PathBuf>,

        /// 提交语言（默认 python3）
        #[arg(long)]
        language: Option<String>,

        /// 显示浏览器窗口
        #[arg(long)]
        visible: bool,
    },

    /// 打开浏览器手动登录并保存登录状态
    Login,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Commands::Submit {
            slug,
            solution,
            language,
            visible,
        } => {
            if visible {
                config.headless = false;
            }
            run_submit(config, slug, solution, language).await
        }
        Commands::Login => {
            config.headless = false;
            run_login(config).await
        }
    }
}

async fn run_submit(
    config: Config,
    slug: String,
    solution: Option<PathBuf>,
    language: Option<String>,
) -> Result<()> {
    let language = match language {
        Some(tag) => tag.parse::<Language>()?,
        None => config.default_language,
    };

    // 先校验 slug 和解答文件，再启动浏览器
    let mut request = SubmissionRequest::new(slug, String::new(), language)?;
    let solution_path = solution.unwrap_or_else(|| default_solution_path(&config, &request.slug));
    request.code = load_solution(&solution_path).await?;

    logging::log_startup(&config);

    let factory = ChromiumContextFactory::new(&config);
    let mut orchestrator = SubmissionOrchestrator::new(config.clone(), Box::new(factory));
    if !config.headless {
        orchestrator = orchestrator.with_operator(Box::new(StdinOperator));
    }

    match orchestrator.submit(&request).await {
        Ok(report) => {
            logging::print_final_report(&report);
            Ok(())
        }
        Err(SubmitError::BrowserUnavailable(e)) => {
            error!("❌ 浏览器不可用: {}", e);
            print_manual_instructions(&config, &request, &solution_path);
            Ok(())
        }
        Err(SubmitError::Auth(e)) => {
            error!("[AUTH] ❌ {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_login(config: Config) -> Result<()> {
    let factory = ChromiumContextFactory::new(&config);

    match save_auth_interactively(&config, &factory, &StdinOperator).await {
        Ok(true) => {
            info!("✅ 登录状态已保存: {}", config.auth_state_path.display());
            Ok(())
        }
        Ok(false) => anyhow::bail!(
            "登录状态保存失败: {}",
            config.auth_state_path.display()
        ),
        Err(e) => Err(e.into()),
    }
}

fn print_manual_instructions(config: &Config, request: &SubmissionRequest, solution_path: &Path) {
    info!("[MANUAL] 无法启动浏览器，请手动提交:");
    info!("[MANUAL]   1. 打开 {}", request.problem_url(&config.site_url));
    info!("[MANUAL]   2. 把 {} 的内容粘贴到编辑器", solution_path.display());
    info!("[MANUAL]   3. 选择语言 {} 并点击 Submit", request.language);
}
