// Multi-language support module
// Localized UI strings for English and Chinese

#[derive(Clone, Debug)]
pub struct Assets {
    // Top panel
    pub title: &'static str,
    pub mines_fmt: &'static str, // "Mines: {}"
    pub btn_new_game: &'static str,

    // Info line
    pub hint: &'static str,
    pub status_started: &'static str,
    pub status_won: &'static str,
    pub status_lost: &'static str,

    // Outcome modals
    pub win_title: &'static str,
    pub win_message: &'static str,
    pub loss_title: &'static str,
    pub loss_message: &'static str,
    pub btn_close: &'static str,

    // Footer
    pub footer_keys: &'static str,

    // Terminal size messages
    pub tsmsg_title: &'static str,
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        title: "MINESWEEPER",
        mines_fmt: "Mines: {}",
        btn_new_game: " New Game ",

        hint: "Left Click: Reveal | Right Click: Flag",
        status_started: "Game Started!",
        status_won: "You Won!",
        status_lost: "Game Over",

        win_title: "Victory!",
        win_message: "Congratulations! You found all mines!",
        loss_title: "Game Over",
        loss_message: "You hit a mine! Better luck next time!",
        btn_close: " CLOSE ",

        footer_keys: " F2: New   Arrows: Move   Space: Reveal   F: Flag   Esc: Exit ",

        tsmsg_title: "Resize Terminal",
        tsmsg_line1: "Terminal size too small.",
        tsmsg_line2: "Minimum required: {} x {}",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        title: "扫雷",
        mines_fmt: "地雷：{}",
        btn_new_game: " 新游戏 ",

        hint: "左键：翻开 | 右键：标旗",
        status_started: "游戏开始！",
        status_won: "你赢了！",
        status_lost: "游戏结束",

        win_title: "胜利！",
        win_message: "恭喜！你找出了所有地雷！",
        loss_title: "游戏结束",
        loss_message: "你踩到了地雷！下次好运！",
        btn_close: " 关闭 ",

        footer_keys: " F2：新游戏   方向键：移动   空格：翻开   F：标旗   Esc：退出 ",

        tsmsg_title: "调整终端",
        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
    }
}

/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let code = if lang_code.to_lowercase().starts_with("zh") { "zh" } else { "en" };
        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" { chinese_assets() } else { english_assets() },
        }
    }
}

/// Substitute `{}` placeholders in order
pub fn fill(fmt: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(fmt.len() + 8);
    let mut rest = fmt;
    for arg in args {
        match rest.find("{}") {
            Some(i) => {
                out.push_str(&rest[..i]);
                out.push_str(&arg.to_string());
                rest = &rest[i + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
