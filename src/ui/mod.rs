/// UI layer: sidebar controls, top bar, and the three chart panels.

pub mod charts;
pub mod panels;
