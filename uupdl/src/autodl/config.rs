//! The download configuration built for one request.

use tracing::{debug, info, warn};

use super::error::AutoDlError;
use super::metadata::UpdateMetadata;
use super::options::convert_options;
use super::params::AutoDlParams;
use crate::api::{ApiError, ResolvedFiles, UpdatePolicy, UpdateServices, NEUTRAL_PACK};
use crate::edition::is_app_tag;
use crate::naming::{archive_name, ALL_LANGUAGES};
use crate::package::{Aria2Package, ConvertPackage, PackageBuilder, PackageRequest};
use crate::request::RequestContext;

/// Pack style used when resolving files: full file list with links.
pub const PACK_STYLE_FULL: u8 = 2;

/// Highest build that never ships separate app packages.
pub const LAST_BUILD_WITHOUT_APPS: u32 = 22557;

/// Edition key of the app package in the neutral pack bucket.
const APP_PACK_EDITION: &str = "APP";

/// Download configuration for a single automatic-download request.
///
/// All derived values are computed once by [`DownloadConfig::build`] and never
/// change afterwards.
pub struct DownloadConfig<'a> {
    params: AutoDlParams,
    policy: &'a dyn UpdatePolicy,
    files: ResolvedFiles,
    metadata: UpdateMetadata,
    build_number: u32,
    lang: String,
    edition: String,
    archive_name: String,
    download_url: String,
    app_download_url: Option<String>,
}

impl<'a> DownloadConfig<'a> {
    /// Resolves the update and derives names and URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AutoDlError::FileResolution`] with the resolver's code when
    /// the files of the update cannot be resolved. Metadata and pack lookups
    /// are best effort and fall back to defaults.
    pub fn build(
        params: AutoDlParams,
        request: &RequestContext,
        services: UpdateServices<'a>,
    ) -> Result<Self, AutoDlError> {
        let files = resolve_files(&params, &services)?;

        let metadata = resolve_metadata(&params.update_id, &services);
        let build_number = metadata.build_number();

        let lang = params
            .language_pack
            .clone()
            .unwrap_or_else(|| ALL_LANGUAGES.to_string());
        let edition = params.desired_edition_mixed.edition_tag();
        let archive_name = archive_name(
            &metadata.build,
            &metadata.arch,
            &lang,
            &edition,
            &params.update_id,
        );
        debug!(archive = %archive_name, edition = %edition, "Derived archive name");

        let base_url = request.base_url();
        let download_url = format!(
            "{}?id={}&pack={}&edition={}&aria2=2",
            base_url,
            params.update_id,
            params.language_pack.as_deref().unwrap_or_default(),
            params.desired_edition.as_deref().unwrap_or_default(),
        );
        let app_candidate_url = format!(
            "{}?id={}&pack={}&edition=app&aria2=2",
            base_url, params.update_id, NEUTRAL_PACK
        );

        let app_download_url = supports_apps(&params, &metadata, build_number, &services)
            .then_some(app_candidate_url);

        Ok(Self {
            params,
            policy: services.policy,
            files,
            metadata,
            build_number,
            lang,
            edition,
            archive_name,
            download_url,
            app_download_url,
        })
    }

    pub fn params(&self) -> &AutoDlParams {
        &self.params
    }

    /// The resolved file set, for the package builder.
    pub fn files(&self) -> &ResolvedFiles {
        &self.files
    }

    pub fn metadata(&self) -> &UpdateMetadata {
        &self.metadata
    }

    pub fn build_number(&self) -> u32 {
        self.build_number
    }

    /// Language segment of the archive name.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Edition segment of the archive name.
    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Callback URL of the app package, if the update has one.
    pub fn app_download_url(&self) -> Option<&str> {
        self.app_download_url.as_deref()
    }

    pub fn supports_apps(&self) -> bool {
        self.app_download_url.is_some()
    }

    /// Decides which package this request produces.
    ///
    /// # Errors
    ///
    /// In virtual-edition mode: [`AutoDlError::VirtualEditionUnavailable`] if
    /// the build/SKU cannot produce virtual editions or an app edition was
    /// selected, then [`AutoDlError::VirtualEditionUnspecified`] if no
    /// virtual edition was requested.
    pub fn plan(&self, request: &RequestContext) -> Result<PackageRequest, AutoDlError> {
        if !self.params.mode.is_conversion() {
            return Ok(PackageRequest::Aria2(Aria2Package {
                url: self.download_url.clone(),
                archive_name: self.archive_name.clone(),
                app_url: self.app_download_url.clone(),
            }));
        }

        let options = convert_options(request);
        let virtual_editions = self.params.mode.is_virtual_editions();

        if virtual_editions {
            self.verify_virtual_editions()?;
        }

        Ok(PackageRequest::Convert(ConvertPackage {
            url: self.download_url.clone(),
            archive_name: self.archive_name.clone(),
            virtual_editions,
            virtual_edition_list: self.params.desired_virtual_editions.clone(),
            options,
            app_url: self.app_download_url.clone(),
        }))
    }

    /// Plans the package and hands it to `builder`.
    ///
    /// The builder is not called when planning fails.
    pub fn create_package(
        &self,
        request: &RequestContext,
        builder: &mut dyn PackageBuilder,
    ) -> Result<PackageRequest, AutoDlError> {
        let package = self.plan(request)?;

        info!(
            archive = %self.archive_name,
            mode = %self.params.mode,
            apps = self.supports_apps(),
            "Creating package"
        );
        builder.create(&package)?;

        Ok(package)
    }

    fn virtual_editions_available(&self) -> bool {
        self.policy
            .are_virtual_editions_supported(self.build_number, self.metadata.sku)
            && !is_app_tag(&self.edition)
    }

    fn verify_virtual_editions(&self) -> Result<(), AutoDlError> {
        if !self.virtual_editions_available() {
            return Err(AutoDlError::VirtualEditionUnavailable);
        }
        if self.params.desired_virtual_editions.is_empty() {
            return Err(AutoDlError::VirtualEditionUnspecified);
        }
        Ok(())
    }
}

fn resolve_files(
    params: &AutoDlParams,
    services: &UpdateServices<'_>,
) -> Result<ResolvedFiles, AutoDlError> {
    let files = services
        .files
        .resolve_files(
            &params.update_id,
            params.language_pack.as_deref(),
            &params.desired_edition_mixed,
            PACK_STYLE_FULL,
        )
        .map_err(|e| {
            warn!(update_id = %params.update_id, error = %e, "File resolution failed");
            match e {
                ApiError::Resolution(code) => AutoDlError::FileResolution(code),
                other => AutoDlError::FileResolution(other.to_string()),
            }
        })?;

    debug!(files = files.files.len(), "Resolved update files");
    Ok(files)
}

fn resolve_metadata(update_id: &str, services: &UpdateServices<'_>) -> UpdateMetadata {
    match services.metadata.update_info(update_id, true) {
        Ok(info) => UpdateMetadata::from(info),
        Err(e) => {
            warn!(update_id = %update_id, error = %e, "Update info unavailable, using defaults");
            UpdateMetadata::default()
        }
    }
}

fn supports_apps(
    params: &AutoDlParams,
    metadata: &UpdateMetadata,
    build_number: u32,
    services: &UpdateServices<'_>,
) -> bool {
    if build_number <= LAST_BUILD_WITHOUT_APPS
        || services.policy.is_update_blocked(build_number, &metadata.title)
        || params.desired_edition_mixed.excludes_apps()
    {
        return false;
    }

    match services.packs.packs(&params.update_id) {
        Ok(packs) => packs
            .get(NEUTRAL_PACK)
            .is_some_and(|editions| editions.contains_key(APP_PACK_EDITION)),
        Err(e) => {
            warn!(update_id = %params.update_id, error = %e, "Pack listing failed, skipping apps");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::api::{
        FileResolver, MetadataResolver, PackIndex, PackLister, StaticPolicy, UpdateInfo,
    };
    use crate::autodl::DownloadMode;
    use crate::edition::EditionSelection;
    use crate::package::{ConvertOptions, PackageError};
    use crate::request::Scheme;

    const UPDATE_ID: &str = "40a2b91c8f77xyz";

    struct FakeApi {
        file_error: Option<String>,
        info: Result<UpdateInfo, ApiError>,
        neutral_editions: Vec<&'static str>,
        pack_calls: AtomicUsize,
    }

    impl FakeApi {
        fn build(build: &str) -> Self {
            Self {
                file_error: None,
                info: Ok(UpdateInfo {
                    sku: Some(48),
                    build: Some(build.to_string()),
                    arch: Some("amd64".to_string()),
                    title: Some("Windows 11".to_string()),
                }),
                neutral_editions: vec!["APP"],
                pack_calls: Default::default(),
            }
        }

        fn pack_calls(&self) -> usize {
            self.pack_calls.load(Ordering::SeqCst)
        }
    }

    impl FileResolver for FakeApi {
        fn resolve_files(
            &self,
            _update_id: &str,
            _pack: Option<&str>,
            _editions: &EditionSelection,
            pack_style: u8,
        ) -> Result<ResolvedFiles, ApiError> {
            assert_eq!(pack_style, PACK_STYLE_FULL);
            match &self.file_error {
                Some(code) => Err(ApiError::Resolution(code.clone())),
                None => Ok(ResolvedFiles::default()),
            }
        }
    }

    impl MetadataResolver for FakeApi {
        fn update_info(&self, _update_id: &str, ignore_files: bool) -> Result<UpdateInfo, ApiError> {
            assert!(ignore_files);
            self.info.clone()
        }
    }

    impl PackLister for FakeApi {
        fn packs(&self, _update_id: &str) -> Result<PackIndex, ApiError> {
            self.pack_calls.fetch_add(1, Ordering::SeqCst);
            let editions: BTreeMap<String, serde_json::Value> = self
                .neutral_editions
                .iter()
                .map(|e| (e.to_string(), serde_json::Value::Null))
                .collect();
            Ok(PackIndex::from([(NEUTRAL_PACK.to_string(), editions)]))
        }
    }

    #[derive(Default)]
    struct RecordingBuilder {
        calls: usize,
        last: Option<PackageRequest>,
    }

    impl PackageBuilder for RecordingBuilder {
        fn create_aria2_package(&mut self, package: &Aria2Package) -> Result<(), PackageError> {
            self.calls += 1;
            self.last = Some(PackageRequest::Aria2(package.clone()));
            Ok(())
        }

        fn create_convert_package(
            &mut self,
            package: &ConvertPackage,
        ) -> Result<(), PackageError> {
            self.calls += 1;
            self.last = Some(PackageRequest::Convert(package.clone()));
            Ok(())
        }
    }

    fn request() -> RequestContext {
        RequestContext::new(Scheme::Https, "uupdump.net", "/get.php")
    }

    fn build<'a>(
        params: AutoDlParams,
        api: &'a FakeApi,
        policy: &'a StaticPolicy,
    ) -> Result<DownloadConfig<'a>, AutoDlError> {
        DownloadConfig::build(params, &request(), UpdateServices::from_api(api, policy))
    }

    #[test]
    fn test_default_archive_name() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert_eq!(config.archive_name(), "22631.1_amd64_all_all_40a2b91c");
        assert_eq!(config.lang(), "all");
        assert_eq!(config.edition(), "all");
        assert_eq!(config.build_number(), 22631);
    }

    #[test]
    fn test_download_url_uses_raw_parameters() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let params = AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID)
            .with_language_pack("en-us")
            .with_edition("core;professional");
        let config = build(params, &api, &policy).unwrap();

        assert_eq!(
            config.download_url(),
            "https://uupdump.net/get.php?id=40a2b91c8f77xyz&pack=en-us&edition=core;professional&aria2=2"
        );
        assert_eq!(config.archive_name(), "22631.1_amd64_en-us_multi_40a2b91c");
    }

    #[test]
    fn test_absent_parameters_render_empty() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert_eq!(
            config.download_url(),
            "https://uupdump.net/get.php?id=40a2b91c8f77xyz&pack=&edition=&aria2=2"
        );
    }

    #[test]
    fn test_app_url_when_eligible() {
        let api = FakeApi::build("26100.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert_eq!(
            config.app_download_url(),
            Some("https://uupdump.net/get.php?id=40a2b91c8f77xyz&pack=neutral&edition=app&aria2=2")
        );
    }

    #[test]
    fn test_no_apps_at_or_below_threshold() {
        let api = FakeApi::build("22557.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert!(!config.supports_apps());
        assert_eq!(api.pack_calls(), 0);
    }

    #[test]
    fn test_no_apps_when_blocked() {
        let api = FakeApi::build("26100.1");
        let policy =
            StaticPolicy::new().with_block_rule(crate::api::BlockRule::new(26100, "windows"));
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert!(!config.supports_apps());
        assert_eq!(api.pack_calls(), 0);
    }

    #[test]
    fn test_no_apps_when_selection_excludes_them() {
        let api = FakeApi::build("26100.1");
        let policy = StaticPolicy::default();
        for edition in ["UpdateOnly", "app", "professional;APP_MOMENT"] {
            let params =
                AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID).with_edition(edition);
            let config = build(params, &api, &policy).unwrap();
            assert!(!config.supports_apps(), "edition {}", edition);
        }
        assert_eq!(api.pack_calls(), 0);
    }

    #[test]
    fn test_app_key_is_case_sensitive() {
        let mut api = FakeApi::build("26100.1");
        api.neutral_editions = vec!["app", "App"];
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert!(!config.supports_apps());
        assert_eq!(api.pack_calls(), 1);
    }

    #[test]
    fn test_file_resolution_error_stops_construction() {
        let mut api = FakeApi::build("22631.1");
        api.file_error = Some("UNSUPPORTED_LANG".to_string());
        let policy = StaticPolicy::default();

        let err = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .err()
        .unwrap();

        assert_eq!(err.error_code(), "UNSUPPORTED_LANG");
        assert_eq!(api.pack_calls(), 0);
    }

    #[test]
    fn test_metadata_failure_uses_defaults() {
        let mut api = FakeApi::build("22631.1");
        api.info = Err(ApiError::HttpError("timeout".to_string()));
        let policy = StaticPolicy::default();

        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert_eq!(config.metadata(), &UpdateMetadata::default());
        assert_eq!(config.archive_name(), "UNKNOWN_UNKNOWN_all_all_40a2b91c");
        assert!(!config.supports_apps());
    }

    #[test]
    fn test_update_only_archive_name() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let params = AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID)
            .with_language_pack("en-us")
            .with_edition("updateOnly");
        let config = build(params, &api, &policy).unwrap();

        assert_eq!(config.archive_name(), "22631.1_amd64_updates_40a2b91c");
    }

    #[test]
    fn test_download_only_creates_aria2_package() {
        let api = FakeApi::build("26100.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        let mut builder = RecordingBuilder::default();
        config.create_package(&request(), &mut builder).unwrap();

        assert_eq!(builder.calls, 1);
        match builder.last.unwrap() {
            PackageRequest::Aria2(package) => {
                assert_eq!(package.archive_name, "26100.1_amd64_all_all_40a2b91c");
                assert!(package.app_url.is_some());
            }
            other => panic!("unexpected package {:?}", other),
        }
    }

    #[test]
    fn test_convert_passes_options() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::Convert, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        let ctx = request().with_form("cleanup", "1").with_form("esd", "1");
        let package = config.plan(&ctx).unwrap();

        assert!(config.supports_apps());

        assert_eq!(
            package,
            PackageRequest::Convert(ConvertPackage {
                url: config.download_url().to_string(),
                archive_name: "22631.1_amd64_all_all_40a2b91c".to_string(),
                virtual_editions: false,
                virtual_edition_list: Vec::new(),
                options: ConvertOptions {
                    updates: 0,
                    cleanup: 1,
                    netfx: 0,
                    esd: 1,
                },
                app_url: Some(
                    "https://uupdump.net/get.php?id=40a2b91c8f77xyz&pack=neutral&edition=app&aria2=2"
                        .to_string()
                ),
            })
        );
    }

    #[test]
    fn test_convert_without_app_bucket() {
        let mut api = FakeApi::build("22631.1");
        api.neutral_editions = Vec::new();
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::Convert, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        match config.plan(&request()).unwrap() {
            PackageRequest::Convert(package) => assert_eq!(package.app_url, None),
            other => panic!("unexpected package {:?}", other),
        }
        assert_eq!(api.pack_calls(), 1);
    }

    #[test]
    fn test_virtual_editions_unspecified() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::ConvertWithVirtualEditions, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        let mut builder = RecordingBuilder::default();
        let err = config.create_package(&request(), &mut builder).unwrap_err();

        assert_eq!(err.error_code(), "UNSPECIFIED_VE");
        assert_eq!(builder.calls, 0);
    }

    #[test]
    fn test_virtual_editions_unavailable_for_sku() {
        let mut api = FakeApi::build("22631.1");
        if let Ok(info) = api.info.as_mut() {
            info.sku = Some(7);
        }
        let policy = StaticPolicy::default();
        let params = AutoDlParams::new(DownloadMode::ConvertWithVirtualEditions, UPDATE_ID)
            .with_virtual_editions(["Enterprise"]);
        let config = build(params, &api, &policy).unwrap();

        let err = config.plan(&request()).unwrap_err();
        assert_eq!(err.error_code(), "VE_UNAVAILABLE");
    }

    #[test]
    fn test_virtual_editions_unavailable_for_app_edition() {
        let api = FakeApi::build("26100.1");
        let policy = StaticPolicy::default();
        let params = AutoDlParams::new(DownloadMode::ConvertWithVirtualEditions, UPDATE_ID)
            .with_edition("pro;app")
            .with_virtual_editions(["Enterprise"]);
        let config = build(params, &api, &policy).unwrap();

        assert_eq!(config.edition(), "app");
        assert!(matches!(
            config.plan(&request()),
            Err(AutoDlError::VirtualEditionUnavailable)
        ));
    }

    #[test]
    fn test_unavailable_takes_precedence_over_unspecified() {
        let api = FakeApi::build("16299.1");
        let policy = StaticPolicy::default();
        let config = build(
            AutoDlParams::new(DownloadMode::ConvertWithVirtualEditions, UPDATE_ID),
            &api,
            &policy,
        )
        .unwrap();

        assert!(matches!(
            config.plan(&request()),
            Err(AutoDlError::VirtualEditionUnavailable)
        ));
    }

    #[test]
    fn test_virtual_editions_package() {
        let api = FakeApi::build("22631.1");
        let policy = StaticPolicy::default();
        let params = AutoDlParams::new(DownloadMode::ConvertWithVirtualEditions, UPDATE_ID)
            .with_virtual_editions(["Enterprise", "Education"]);
        let config = build(params, &api, &policy).unwrap();

        let ctx = request().with_query("autodl", "3");
        match config.plan(&ctx).unwrap() {
            PackageRequest::Convert(package) => {
                assert!(package.virtual_editions);
                assert_eq!(package.virtual_edition_list, vec!["Enterprise", "Education"]);
                assert_eq!(package.options.updates, 1);
            }
            other => panic!("unexpected package {:?}", other),
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_no_apps_up_to_threshold(
                build in 0u32..=LAST_BUILD_WITHOUT_APPS,
                minor in 0u32..5000,
            ) {
                let api = FakeApi::build(&format!("{}.{}", build, minor));
                let policy = StaticPolicy::default();
                let config = super::build(
                    AutoDlParams::new(DownloadMode::DownloadOnly, UPDATE_ID),
                    &api,
                    &policy,
                ).unwrap();

                prop_assert!(!config.supports_apps());
                prop_assert_eq!(config.app_download_url(), None);
            }
        }
    }
}
