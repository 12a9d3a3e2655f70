//! # 美化输出工具
//!
//! 提供统一的终端输出样式，以及带星号边框的横幅。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 横幅默认宽度
pub const BANNER_WIDTH: usize = 80;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印输入到输出文件的消息
pub fn print_saved(from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// 打印星号边框横幅
pub fn pretty_print(text: &str) {
    println!("\n{}\n", framed(text, BANNER_WIDTH));
}

/// 生成星号边框横幅，文本居中；过长的文本按单词换行
pub fn framed(text: &str, width: usize) -> String {
    let width = width.max(5);
    let stars = "*".repeat(width);

    let mut lines = vec![stars.clone()];
    for line in wrap(text, width - 4) {
        let len = line.chars().count();
        let left = ((width - len) / 2).saturating_sub(1);
        let right = width.saturating_sub(len + left + 2);
        lines.push(format!("*{}{}{}*", " ".repeat(left), line, " ".repeat(right)));
    }
    lines.push(stars);

    lines.join("\n")
}

/// 按单词换行，单词本身超长时按字符截断
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let extra = if current.is_empty() { 0 } else { 1 };
        if current.chars().count() + extra + word.len() > max {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_centres_text() {
        let banner = framed("Support", 20);
        let lines: Vec<&str> = banner.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "*".repeat(20));
        assert_eq!(lines[1], "*     Support      *");
        assert!(lines.iter().all(|l| l.chars().count() == 20));
    }

    #[test]
    fn test_framed_wraps_long_text() {
        let banner = framed("Estimating isosurface of amplitude", 20);
        let lines: Vec<&str> = banner.lines().collect();

        assert!(lines.len() > 3);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
        assert!(lines[1].contains("Estimating"));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 5), vec![""]);
    }
}
