use crate::config::DemoConfig;
use crate::demo_fs::DemoFs;
use crate::directory_tree::DirectoryStrategy;
use lazy_tree::TreeRoot;
use lazy_tree_zoon::{TaskSpawner, tree_view};
use std::rc::Rc;
use zoon::*;

pub struct LazyTreeApp {
    tree: Rc<TreeRoot<DirectoryStrategy>>,
}

impl LazyTreeApp {
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let strategy = DirectoryStrategy::new(DemoFs::new(config.latency_ms));
        let tree = TreeRoot::builder(strategy)
            .config(config.tree)
            .spawner(TaskSpawner)
            .build()?;
        tree.schedule_reset();
        Ok(Self {
            tree: Rc::new(tree),
        })
    }

    pub fn root(&self) -> impl Element {
        Column::new()
            .s(Height::screen())
            .s(Width::fill())
            .s(Padding::all(16))
            .s(Gap::new().y(12))
            .s(Font::new().family([
                FontFamily::new("Inter"),
                FontFamily::new("system-ui"),
                FontFamily::SansSerif,
            ]))
            .item(self.toolbar())
            .item(
                El::new()
                    .s(Width::fill())
                    .s(Scrollbars::both())
                    .child(tree_view(&self.tree)),
            )
    }

    fn toolbar(&self) -> impl Element {
        let tree = Rc::clone(&self.tree);
        Row::new()
            .s(Gap::new().x(12))
            .s(Align::new().center_y())
            .item(
                El::new()
                    .s(Font::new().size(18).weight(FontWeight::Bold))
                    .child(Text::new("Lazy tree")),
            )
            .item(
                Button::new()
                    .s(Padding::new().x(8).y(4))
                    .label("Reset")
                    .on_press(move || tree.schedule_reset()),
            )
    }
}
