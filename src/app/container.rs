use std::sync::Arc;

use crate::adapters::{
    AppConfig, FfmpegTranscoder, Mp4BoxAdapter, Mp4ametaTagWriter, ToolPaths, ToolRunner,
};
use crate::app::{build_interactor::BuildInteractor, inspect_interactor::InspectInteractor};
use crate::ports::{MetadataExtractPort, MuxPort, TagWritePort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn build_interactor(&self) -> Arc<BuildInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

pub struct DefaultAppContainer {
    build_interactor: Arc<BuildInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    /// Wire the external tool adapters for the resolved configuration
    pub fn new(config: &AppConfig) -> Self {
        let tools = Arc::new(ToolPaths::resolve(config));
        let runner = ToolRunner::from_secs(config.tool_timeout_secs);

        let transcode_port = Arc::new(FfmpegTranscoder::new(Arc::clone(&tools), runner));
        let mp4box = Arc::new(Mp4BoxAdapter::new(Arc::clone(&tools), runner));
        let tag_port = Arc::new(Mp4ametaTagWriter::new());

        let build_interactor = Arc::new(BuildInteractor::new(
            transcode_port as Arc<dyn TranscodePort>,
            Arc::clone(&mp4box) as Arc<dyn MuxPort>,
            tag_port as Arc<dyn TagWritePort>,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&mp4box) as Arc<dyn MetadataExtractPort>,
        ));

        Self {
            build_interactor,
            inspect_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn build_interactor(&self) -> Arc<BuildInteractor> {
        Arc::clone(&self.build_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
