use crate::game::{BoardView, Cell, Position};

/// Plain-text board: `#` border, `@` food, `H` heads, `S` bodies.
pub fn render_ascii(view: &BoardView) -> String {
    let border = "#".repeat(view.size + 2);
    let mut out = String::with_capacity((view.size + 3) * (view.size + 2));

    out.push_str(&border);
    out.push('\n');
    for y in 0..view.size {
        out.push('#');
        for x in 0..view.size {
            let glyph = match view.cell(Position::new(x as i32, y as i32)) {
                Some(Cell::Food) => '@',
                Some(Cell::Head(_)) => 'H',
                Some(Cell::Body(_)) => 'S',
                Some(Cell::Empty) | None => ' ',
            };
            out.push(glyph);
        }
        out.push_str("#\n");
    }
    out.push_str(&border);
    out.push('\n');
    out
}
