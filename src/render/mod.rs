use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use neuraldive::{Game, map::FloorMap};

/// Splits `text` into lines no wider than `width`, breaking on spaces.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

pub fn draw_hud(ctx: &mut BTerm, game: &Game, frame: u64) {
    let (width, _) = ctx.get_char_size();
    ctx.draw_box(0, 0, width as i32 - 1, 3, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(
        2,
        1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!(
            "NEURAL DIVE · Layer {}/{} · Turn {}",
            game.current_floor(),
            game.config().max_floors,
            frame
        ),
    );

    let ratio = game.progress().coherence.ratio();
    let coherence_color = if ratio <= 0.3 {
        RGB::named(RED)
    } else if ratio <= 0.6 {
        RGB::named(ORANGE)
    } else {
        RGB::named(LIGHT_GREEN)
    };
    ctx.print_color(
        2,
        2,
        coherence_color,
        RGB::named(BLACK),
        format!("Coherence {}/{}", game.coherence(), game.max_coherence()),
    );

    let mut status = format!("Knowledge {}", game.knowledge().len());
    if game.quest_active() {
        status.push_str(&format!(
            " · Quest {}/{}",
            game.quest_completed_npcs().len(),
            game.quest_targets().len()
        ));
    }
    if game.is_floor_complete() {
        status.push_str(" · Layer clear");
    }
    ctx.print_color(24, 2, RGB::named(LIGHT_CYAN), RGB::named(BLACK), status);
}

pub fn draw_map(ctx: &mut BTerm, map: &FloorMap, origin: Point) {
    for y in 0..map.height {
        for x in 0..map.width {
            let point = Point::new(x, y);
            if let Some(tile) = map.tile_at(point) {
                ctx.set(
                    origin.x + x,
                    origin.y + y,
                    tile.fg(map.floor),
                    tile.bg(),
                    tile.glyph(),
                );
            }
        }
    }
}

pub fn draw_entities(ctx: &mut BTerm, game: &Game, origin: Point) {
    game.ecs().each_renderable(true, |point, renderable| {
        ctx.set(
            origin.x + point.x,
            origin.y + point.y,
            renderable.color,
            RGB::named(BLACK),
            renderable.glyph,
        );
    });
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let inner = width as usize - 4;
    ctx.draw_box(
        0,
        start_y,
        width as i32 - 1,
        7,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, start_y + 1, RGB::named(WHITE), RGB::named(BLACK), "Log");
    let rows = log
        .iter()
        .flat_map(|entry| wrap_text(entry, inner))
        .filter(|line| !line.is_empty())
        .take(5);
    for (row, line) in rows.enumerate() {
        ctx.print(2, start_y + 2 + row as i32, line);
    }
}

fn draw_panel(ctx: &mut BTerm, title: &str, lines: &[(String, RGB)]) {
    let (width, height) = ctx.get_char_size();
    let (width, height) = (width as i32, height as i32);
    let box_w = width - 10;
    let box_h = (lines.len() as i32 + 4).min(height - 4);
    let left = 5;
    let top = ((height - box_h) / 2).max(1);
    ctx.draw_box(left, top, box_w, box_h, RGB::named(CYAN), RGB::named(BLACK));
    ctx.print_color(left + 2, top, RGB::named(YELLOW), RGB::named(BLACK), format!(" {title} "));
    for (row, (line, color)) in lines.iter().enumerate().take((box_h - 3) as usize) {
        ctx.print_color(left + 2, top + 2 + row as i32, *color, RGB::named(BLACK), line);
    }
}

/// Question and numbered answers for the active conversation, if any.
pub fn draw_conversation(ctx: &mut BTerm, game: &Game) {
    let Some(conversation) = game.active_conversation() else {
        return;
    };
    let (width, _) = ctx.get_char_size();
    let inner = width as usize - 16;
    let mut lines = Vec::new();
    match conversation.current_question() {
        Some(question) => {
            for line in wrap_text(&question.text, inner) {
                lines.push((line, RGB::named(WHITE)));
            }
            lines.push((String::new(), RGB::named(WHITE)));
            for (idx, answer) in question.answers.iter().enumerate() {
                for (row, line) in wrap_text(&answer.text, inner - 4).into_iter().enumerate() {
                    let label = if row == 0 {
                        format!("{}. {line}", idx + 1)
                    } else {
                        format!("   {line}")
                    };
                    lines.push((label, RGB::named(LIGHT_CYAN)));
                }
            }
        }
        None => lines.push(("Press any answer key to conclude.".into(), RGB::named(WHITE))),
    }
    lines.push((String::new(), RGB::named(WHITE)));
    lines.push(("[1-4] answer · [Esc] leave".into(), RGB::named(GRAY)));
    draw_panel(ctx, &conversation.npc_name, &lines);
}

pub fn draw_reading(ctx: &mut BTerm, game: &Game) {
    let Some(info) = game.reading() else {
        return;
    };
    let (width, _) = ctx.get_char_size();
    let inner = width as usize - 16;
    let mut lines = info
        .content
        .iter()
        .flat_map(|line| wrap_text(line, inner))
        .map(|line| (line, RGB::named(WHITE)))
        .collect::<Vec<_>>();
    lines.push((String::new(), RGB::named(WHITE)));
    lines.push(("[Esc] close".into(), RGB::named(GRAY)));
    draw_panel(ctx, &info.title, &lines);
}

/// Game-over or victory banner with the final score.
pub fn draw_ending(ctx: &mut BTerm, game: &Game) {
    let (title, color) = if game.is_won() {
        ("NEURAL DIVE COMPLETE", RGB::named(LIGHT_GREEN))
    } else if game.is_game_over() {
        ("COHERENCE LOST", RGB::named(RED))
    } else {
        return;
    };
    let stats = game.final_stats();
    let lines = vec![
        (title.to_string(), color),
        (String::new(), color),
        (
            format!(
                "Questions {} · correct {} · accuracy {:.0}%",
                stats.questions_answered, stats.questions_correct, stats.accuracy
            ),
            RGB::named(WHITE),
        ),
        (
            format!(
                "NPCs completed {} · knowledge {}",
                stats.npcs_completed, stats.knowledge_modules
            ),
            RGB::named(WHITE),
        ),
        (format!("Score {}", stats.score), RGB::named(YELLOW)),
        (String::new(), color),
        ("[Q] quit".into(), RGB::named(GRAY)),
    ];
    draw_panel(ctx, "Session over", &lines);
}
