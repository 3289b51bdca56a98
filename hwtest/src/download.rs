//! Files handed over to the file-driven keystore.

use chrono::{DateTime, TimeZone};

use crate::test::{Test, TestParams};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("Test name '{0}' does not tell the network and the format")]
    UnexpectedName(String),
    #[error("Test '{0}' has no transaction to sign")]
    NoTransaction(String),
    #[error("Test '{0}' has no wallet parameters")]
    NoParams(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub body: Vec<u8>,
}

/// Second and third words of names like `Sign Testnet P2SH transaction`.
fn name_bits(name: &str) -> Result<(char, &str), DownloadError> {
    let mut bits = name.split(' ').skip(1);
    match (
        bits.next().and_then(|network| network.chars().next()),
        bits.next(),
    ) {
        (Some(network), Some(format)) if !format.is_empty() => Ok((network, format)),
        _ => Err(DownloadError::UnexpectedName(name.to_string())),
    }
}

/// The transaction to sign, named after the local time of the download.
pub fn psbt_download<Tz: TimeZone>(
    test: &dyn Test,
    now: &DateTime<Tz>,
) -> Result<Download, DownloadError>
where
    Tz::Offset: std::fmt::Display,
{
    let name = test.name();
    let (network, format) = name_bits(&name)?;
    let request = test
        .interaction()
        .request()
        .ok_or_else(|| DownloadError::NoTransaction(name.clone()))?;
    Ok(Download {
        filename: format!("{}-{}-{}.psbt", now.format("%H%M"), format, network),
        body: request.to_bytes(),
    })
}

/// The multisig wallet the keystore must know before signing.
pub fn wallet_config_download(
    name: &str,
    params: Option<&TestParams>,
) -> Result<Download, DownloadError> {
    let (network, format) = name_bits(name)?;
    let params = params.ok_or_else(|| DownloadError::NoParams(name.to_string()))?;
    let wallet_name = format!("{}-{}", format.to_lowercase(), network);
    let format = if params.format.contains('-') {
        "P2WSH-P2SH"
    } else {
        params.format.as_str()
    };

    let mut body = format!(
        "# Coldcard Multisig setup file for test suite\n\
         #\n\
         Name: {}\n\
         Policy: 2 of 2\n\
         Format: {}\n\
         Derivation: {}\n\
         \n",
        wallet_name, format, params.derivation
    );
    body.push_str(
        &params
            .extended_public_keys
            .iter()
            .map(|key| format!("{}: {}", key.root_fingerprint, key.base58))
            .collect::<Vec<_>>()
            .join("\r\n"),
    );
    body.push_str("\r\n");

    Ok(Download {
        filename: format!("wc-{}.txt", wallet_name),
        body: body.into_bytes(),
    })
}
