#![no_main]

use arbitrary::Arbitrary;
use formgrid_layout::{
    BodyGrid, BodyGridKind, FieldRole, FormField, GridData, GridDataHints, GridField,
    find_overlaps,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzField {
    w: u8,
    h: u8,
    hidden: bool,
    button: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    columns: u8,
    vertical: bool,
    fields: Vec<FuzzField>,
}

fn row_span(h: u8) -> u16 {
    if h == u8::MAX { u16::MAX } else { u16::from(h % 8) }
}

fuzz_target!(|input: FuzzInput| {
    // Spans stay small (0..8) except for an occasional huge row span that
    // pushes later fields onto the last grid edge.
    let columns = u16::from(input.columns % 9);
    let kind = if input.vertical {
        BodyGridKind::Vertical
    } else {
        BodyGridKind::Horizontal
    };

    let mut fields: Vec<FormField> = input
        .fields
        .iter()
        .take(64)
        .enumerate()
        .map(|(i, f)| {
            let field = FormField::new(format!("f{i}"))
                .with_hints(GridDataHints::sized(u16::from(f.w % 8), row_span(f.h)))
                .with_visible(!f.hidden);
            if f.button {
                field.with_role(FieldRole::ProcessButton)
            } else {
                field
            }
        })
        .collect();

    let mut grid = BodyGrid::new(kind);
    grid.validate(&mut fields, columns);

    let placed: Vec<GridData> = fields
        .iter()
        .filter(|f| f.is_visible() && f.role() == FieldRole::Control)
        .map(|f| *f.grid_data())
        .collect();

    // Post-conditions that must always hold:
    assert!(find_overlaps(&placed).is_empty(), "overlapping placements");
    let rows = placed.iter().map(GridData::bottom).max().unwrap_or(0);
    assert_eq!(u32::from(grid.grid_row_count()), rows, "row count mismatch");
    for data in &placed {
        assert!(
            data.right() <= u32::from(grid.grid_column_count()),
            "placement outside columns"
        );
    }

    // Second validation must be identical.
    let first: Vec<GridData> = fields.iter().map(|f| *f.grid_data()).collect();
    grid.validate(&mut fields, columns);
    let second: Vec<GridData> = fields.iter().map(|f| *f.grid_data()).collect();
    assert_eq!(first, second, "validation not idempotent");
});
