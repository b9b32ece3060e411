//! 公開ディスクリプタの組み立て
//!
//! 提供中のサブモデルから、レジストリへ登録するシェルディスクリプタを作る。

use reqwest::Url;
use twinreg_common::{
    descriptor::{Endpoint, ShellDescriptor, SubmodelDescriptor},
    error::{ModelError, ModelResult},
    identifier::Identifier,
    model::Submodel,
};

/// シェルエンドポイントのインターフェース名
pub const SHELL_INTERFACE: &str = "AAS-3.0";

/// サブモデルエンドポイントのインターフェース名
pub const SUBMODEL_INTERFACE: &str = "SUBMODEL-3.0";

/// サブモデルの公開URL（`{base}/submodels/{id}/submodel`、IDはエンコードする）
pub fn submodel_address(base_url: &str, id: &Identifier) -> ModelResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ModelError::InvalidArgument(format!("public url '{}': {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| {
            ModelError::InvalidArgument(format!("public url '{}' cannot be a base", base_url))
        })?
        .pop_if_empty()
        .push("submodels")
        .push(id.as_str())
        .push("submodel");
    Ok(url.to_string())
}

/// 提供中のサブモデルを内包するシェルディスクリプタを作る
pub fn shell_descriptor(
    aas_id: &Identifier,
    id_short: &str,
    base_url: &str,
    submodels: &[Submodel],
) -> ModelResult<ShellDescriptor> {
    let mut shell = ShellDescriptor::new(aas_id.clone(), id_short)
        .with_endpoint(Endpoint::new(SHELL_INTERFACE, base_url).with_protocol(scheme_of(base_url)));

    for submodel in submodels {
        let address = submodel_address(base_url, &submodel.id)?;
        let endpoint =
            Endpoint::new(SUBMODEL_INTERFACE, address).with_protocol(scheme_of(base_url));
        let mut descriptor =
            SubmodelDescriptor::new(submodel.id.clone(), submodel.id_short.clone())
                .with_endpoint(endpoint);
        descriptor.semantic_id = submodel.semantic_id.clone();
        descriptor.administration = submodel.administration.clone();
        descriptor.description = submodel.description.clone();
        shell.upsert_submodel(descriptor);
    }

    Ok(shell)
}

fn scheme_of(url: &str) -> String {
    url.split_once("://")
        .map(|(scheme, _)| scheme.to_string())
        .unwrap_or_else(|| "http".to_string())
}
