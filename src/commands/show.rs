use colored::Colorize;
use itertools::Itertools;
use sea_orm::prelude::*;

use crate::entities::{prelude::*, *};
use crate::sync::ModDraft;

pub async fn show(db: &DatabaseConnection, mod_id: i32) -> crate::Result<()> {
    let draft = ModDraft::load(db, mod_id).await?;
    let game_mod = &draft.record;
    let developer = game_mod.find_related(Developer).one(db).await?;
    let links = game_mod.find_related(ModLink).all(db).await?;
    let faqs = game_mod.find_related(ModFaq).all(db).await?;

    let title_corner = boxy::Char::upper_left(boxy::Weight::Thick);
    let title_side_h = boxy::Char::horizontal(boxy::Weight::Thick).to_string();
    let title_side_v = boxy::Char::vertical(boxy::Weight::Thick);
    let title_branch = boxy::Char::right_tee(boxy::Weight::Thick).down(boxy::Weight::Normal);
    let tree = Tree::new();

    let title = if game_mod.is_archived {
        format!("{} (archived)", game_mod.name)
    } else {
        game_mod.name.clone()
    };
    let width = title.chars().count() + 2;
    println!(
        "{}{}{}",
        title_corner,
        title_side_h.repeat(width),
        title_corner.rotate_cw(1)
    );
    println!("{} {} {}", title_side_v, title.bold(), title_side_v);
    println!(
        "{}{}{}",
        title_branch,
        title_side_h.repeat(width),
        title_corner.rotate_cw(2)
    );

    let fields = [
        ("Mod ID:", game_mod.id.to_string()),
        (
            "Developer:",
            developer
                .map(|d| d.github_username)
                .unwrap_or_else(|| game_mod.developer_id.to_string()),
        ),
        (
            "Repository:",
            game_mod.github_repo_url.clone().unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Description:",
            game_mod.description.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Stars:", game_mod.stars.to_string()),
        (
            "Thumbnail:",
            game_mod.image_url.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Gallery:", format!("{} images", draft.gallery.len())),
        (
            "Install manifest:",
            if game_mod.install_json.is_some() { "yes" } else { "no" }.to_string(),
        ),
        ("Updated:", game_mod.updated_at.to_rfc3339()),
    ];
    for (label, value) in fields {
        println!("{}{}{} {}", tree.more, tree.node, label.bold(), value);
    }

    let link_lines: Vec<String> = links
        .iter()
        .map(|l| match &l.icon {
            Some(icon) => format!("[{}] {} {}", icon, l.label, l.url.dimmed()),
            None => format!("{} {}", l.label, l.url.dimmed()),
        })
        .collect();
    tree.section("Links:", &link_lines, false);

    let faq_lines: Vec<String> = faqs.iter().map(|f| f.question.clone()).collect();
    tree.section("FAQ:", &faq_lines, false);

    let release_lines: Vec<String> = draft
        .releases
        .iter()
        .sorted_by(|a, b| b.released_at.cmp(&a.released_at))
        .map(|r| {
            let downloads: i32 = r.assets.iter().map(|a| a.download_count).sum();
            format!(
                "{} {} ({} assets, {} downloads)",
                r.version.bold(),
                r.released_at.format("%Y-%m-%d"),
                r.assets.len(),
                downloads
            )
        })
        .collect();
    tree.section("Releases:", &release_lines, true);
    Ok(())
}

struct Tree {
    more: String,
    done: String,
    vertical: String,
    node: String,
    down: String,
}

impl Tree {
    fn new() -> Self {
        Self {
            more: boxy::Char::right_tee(boxy::Weight::Normal).to_string(),
            done: boxy::Char::lower_left(boxy::Weight::Normal).to_string(),
            vertical: boxy::Char::vertical(boxy::Weight::Normal).to_string(),
            node: boxy::Char::left_half(boxy::Weight::Normal).to_string(),
            down: boxy::Char::down_tee(boxy::Weight::Normal).to_string(),
        }
    }

    /// A labelled branch with one leaf per line.
    fn section(&self, label: &str, lines: &[String], last: bool) {
        let branch = if last { &self.done } else { &self.more };
        if lines.is_empty() {
            println!("{}{}{} {}", branch, self.node, label.bold(), "none".dimmed());
            return;
        }
        println!("{}{}{}{}", branch, self.down, self.node, label.bold());
        let indent = if last { " " } else { self.vertical.as_str() };
        let mut lines = lines.iter().peekable();
        while let Some(line) = lines.next() {
            println!(
                "{}{}{}{}",
                indent,
                if lines.peek().is_some() { &self.more } else { &self.done },
                self.node,
                line
            );
        }
    }
}
