use canopy::DataSource;
use canopy::memory::HierarchyData;
use canopy::memory::InMemorySource;
use canopy::view::FlatView;
use canopy::view::Toggle;

fn print(view: &FlatView<InMemorySource<&'static str>>) -> canopy::Result<()> {
    for row in view.fetch(0, view.len().saturating_sub(1))? {
        let marker = match (row.expanded, view.source().has_children(&row.item)?) {
            (true, _) => "-",
            (false, true) => "+",
            (false, false) => " ",
        };
        println!("{:>3} {}{} {}", row.index, "  ".repeat(row.depth), marker, row.item);
    }
    println!();
    return Ok(());
}

fn main() -> canopy::Result<()> {
    let mut builder = HierarchyData::builder();
    builder
        .add_items(None, ["Cargo.toml", "src", "tests", "README.md"])?
        .add_items(Some(&"src"), ["lib.rs", "mapper.rs", "view"])?
        .add_items(Some(&"view"), ["mod.rs", "rows.rs"])?
        .add_items(Some(&"tests"), ["mapper_tests.rs", "view_tests.rs"])?;

    let mut view = FlatView::new(InMemorySource::new(builder.build()))?;
    print(&view)?;

    view.toggle(Toggle { row_key: "src", row_index: 1, collapse: false })?;
    view.toggle(Toggle { row_key: "view", row_index: 4, collapse: false })?;
    view.toggle(Toggle { row_key: "tests", row_index: 7, collapse: false })?;
    print(&view)?;

    let removed = view.toggle(Toggle { row_key: "src", row_index: 1, collapse: true })?;
    println!("collapsed src, {} rows", removed.delta());
    print(&view)?;

    return Ok(());
}
