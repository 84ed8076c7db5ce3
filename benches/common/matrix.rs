/// Common dataset shapes used across benchmarks.
#[derive(Debug, Clone, Copy)]
pub struct DatasetShape {
    pub name: &'static str,
    pub rows: usize,
    pub cols: usize,
}

pub const SHAPES: &[DatasetShape] = &[
    DatasetShape {
        name: "small",
        rows: 10_000,
        cols: 32,
    },
    DatasetShape {
        name: "wide",
        rows: 10_000,
        cols: 256,
    },
    DatasetShape {
        name: "tall",
        rows: 200_000,
        cols: 32,
    },
];
