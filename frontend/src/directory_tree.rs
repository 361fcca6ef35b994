use crate::demo_fs::{DemoFs, FsNode, ROOT_PATH};
use lazy_tree::{
    ChildrenCell, ExpandToggleRequest, RecordElementRequest, SubRecordsRequest, TreeStrategy,
};
use lazy_tree_zoon::RenderElement;
use std::rc::Rc;
use zoon::*;

/// Elements the demo places into the tree.
#[derive(Clone)]
pub enum DirectoryElement {
    Label { name: String, is_dir: bool },
    Refresh {
        path: String,
        children: ChildrenCell<FsNode>,
        fs: Rc<DemoFs>,
    },
}

impl RenderElement for DirectoryElement {
    fn render(self) -> impl Element {
        match self {
            DirectoryElement::Label { name, is_dir } => Row::new()
                .s(Gap::new().x(6))
                .item(Text::new(if is_dir { "📁" } else { "📄" }))
                .item(Text::new(name))
                .unify(),
            DirectoryElement::Refresh { path, children, fs } => Button::new()
                .s(Padding::new().x(4))
                .s(Font::new().size(12))
                .label("refresh")
                .on_press(move || {
                    let path = path.clone();
                    let children = children.clone();
                    let fs = Rc::clone(&fs);
                    Task::start(async move {
                        match fs.refresh(&path).await {
                            Ok(nodes) => children.set(nodes),
                            Err(error) => log::warn!("refresh of {path} failed: {error:#}"),
                        }
                    });
                })
                .unify(),
        }
    }
}

/// Serves [`DemoFs`] listings to the tree.
pub struct DirectoryStrategy {
    fs: Rc<DemoFs>,
}

impl DirectoryStrategy {
    pub fn new(fs: DemoFs) -> Self {
        Self { fs: Rc::new(fs) }
    }
}

impl TreeStrategy for DirectoryStrategy {
    type Record = FsNode;
    type Element = DirectoryElement;

    async fn record_element(
        &self,
        request: RecordElementRequest<FsNode, DirectoryElement>,
    ) -> anyhow::Result<Option<DirectoryElement>> {
        let node = request.record;
        if node.is_hidden() {
            return Ok(None);
        }
        Ok(Some(DirectoryElement::Label {
            name: node.name,
            is_dir: node.is_dir,
        }))
    }

    async fn sub_records_state_update(
        &self,
        request: SubRecordsRequest<FsNode, DirectoryElement>,
    ) -> anyhow::Result<()> {
        let path = request
            .record
            .as_ref()
            .map_or(ROOT_PATH, |node| node.path.as_str())
            .to_string();

        if request.record.is_some() {
            request.buttons.replace(vec![DirectoryElement::Refresh {
                path: path.clone(),
                children: request.children.clone(),
                fs: Rc::clone(&self.fs),
            }]);
        }

        let nodes = self.fs.read_dir(&path).await?;
        log::debug!("{path}: {} entries ({:?})", nodes.len(), request.event);
        request.children.set(nodes);
        Ok(())
    }

    async fn expand_toggle_override(
        &self,
        request: ExpandToggleRequest<FsNode, DirectoryElement>,
    ) -> anyhow::Result<()> {
        if !request.record.is_dir {
            request.entry.expand_toggle().hide();
        }
        Ok(())
    }
}
