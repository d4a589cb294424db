use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tabgrid_engine::{Action, BOTTOM_STRING, Cursor, Grid, LayoutParameters, Session, Token, layout};

/// Grid with a scale-like run of notes spread over all strings
fn generate_grid(columns: usize) -> Grid {
    let mut grid = Grid::new();
    for col in 0..columns {
        let string = col % (BOTTOM_STRING + 1);
        let fret = (col * 7) % 25;
        let token = Token::parse(&fret.to_string()).unwrap_or(Token::EMPTY);
        grid.set_token(col, string, token);
    }
    grid
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.sample_size(20);

    let params = LayoutParameters::default();
    for columns in [10, 500, 5_000] {
        let grid = generate_grid(columns);
        let cursor = Some(Cursor::new(columns / 2, 3));
        group.bench_function(format!("columns_{columns}"), |b| {
            b.iter(|| {
                let rendered = layout(black_box(&grid), black_box(&params), cursor);
                black_box(rendered);
            });
        });
    }

    group.finish();
}

fn bench_editing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(20);

    group.bench_function("enter_and_render_200_columns", |b| {
        b.iter(|| {
            let mut session = Session::default();
            for col in 0..200u8 {
                session.apply(Action::AddDigit(col % 10));
                session.apply(Action::MoveRight);
                black_box(session.render());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_layout, bench_editing);
criterion_main!(benches);
