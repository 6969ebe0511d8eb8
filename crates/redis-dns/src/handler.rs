//! Request handler glue between hickory-server and the resolution engine.
//!
//! Each question in a query is resolved independently. Answers from every
//! question go into the answer section; every question that produced no
//! answers adds the zone SOA to the authority section.

use std::iter;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_proto::op::Header;
use hickory_proto::op::MessageType;
use hickory_proto::op::OpCode;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::Name;
use hickory_proto::rr::RData;
use hickory_proto::rr::Record as WireRecord;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::rdata::AAAA;
use hickory_proto::rr::rdata::CNAME;
use hickory_proto::rr::rdata::MX;
use hickory_proto::rr::rdata::NS;
use hickory_proto::rr::rdata::SOA;
use hickory_server::authority::MessageResponse;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::Request;
use hickory_server::server::RequestHandler;
use hickory_server::server::ResponseHandler;
use hickory_server::server::ResponseInfo;
use redis_dns_store::RecordStore;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::answer::AnswerBuilder;
use super::config::ZoneConfig;
use super::names::normalize_fqdn;
use super::resolver::Resolver;
use super::types::Answer;
use super::types::AnswerData;
use super::types::QueryType;
use super::zone::ZoneAuthority;

/// Answers DNS requests from the record store.
///
/// Cheap to clone; UDP and TCP listeners share one instance.
#[derive(Clone)]
pub struct DnsRequestHandler {
    resolver: Resolver,
    answers: AnswerBuilder,
}

impl DnsRequestHandler {
    /// Create a handler serving `zone` from `store`.
    pub fn new(store: Arc<dyn RecordStore>, zone: ZoneConfig) -> Self {
        let zone = Arc::new(zone);
        Self {
            resolver: Resolver::new(store.clone(), zone.clone()),
            answers: AnswerBuilder::new(ZoneAuthority::new(store, zone)),
        }
    }

    /// Zone served by this handler.
    pub fn zone(&self) -> &ZoneConfig {
        self.answers.authority().config()
    }

    /// Resolve one question into wire records.
    ///
    /// Returns the answers, plus the zone SOA for the authority section when
    /// no answer survives conversion to the wire format.
    pub async fn resolve_question(&self, name: &str, query_type: QueryType) -> (Vec<WireRecord>, Option<WireRecord>) {
        let record = self.resolver.lookup(name).await;
        let answers: Vec<WireRecord> =
            self.answers.build(query_type, name, record.as_ref()).await.iter().filter_map(to_wire).collect();
        if !answers.is_empty() {
            return (answers, None);
        }

        debug!(name = %name, query_type = %query_type, "no answers, adding SOA to authority section");
        (answers, to_wire(&self.answers.negative_soa().await))
    }
}

#[async_trait]
impl RequestHandler for DnsRequestHandler {
    async fn handle_request<R: ResponseHandler>(&self, request: &Request, mut response_handle: R) -> ResponseInfo {
        let builder = MessageResponseBuilder::from_message_request(request);

        if request.message_type() != MessageType::Query {
            warn!(peer = %request.src(), id = request.id(), "received a response message as a request");
            let response = builder.error_msg(request.header(), ResponseCode::FormErr);
            return send(&mut response_handle, response, request.header()).await;
        }
        if request.op_code() != OpCode::Query {
            debug!(peer = %request.src(), op_code = ?request.op_code(), "unsupported op code");
            let response = builder.error_msg(request.header(), ResponseCode::NotImp);
            return send(&mut response_handle, response, request.header()).await;
        }

        let mut answers = Vec::new();
        let mut authority = Vec::new();
        for query in request.queries() {
            let name = normalize_fqdn(&query.name().to_string());
            let query_type = QueryType::from(u16::from(query.query_type()));
            info!(query_type = %query_type, name = %name, peer = %request.src(), id = request.id(), "query");

            let (found, soa) = self.resolve_question(&name, query_type).await;
            answers.extend(found);
            authority.extend(soa);
        }

        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        header.set_response_code(ResponseCode::NoError);

        let response = builder.build(
            header,
            answers.iter(),
            iter::empty::<&WireRecord>(),
            authority.iter(),
            iter::empty::<&WireRecord>(),
        );
        send(&mut response_handle, response, request.header()).await
    }
}

async fn send<'a, R: ResponseHandler>(
    response_handle: &mut R,
    response: MessageResponse<
        '_,
        'a,
        impl Iterator<Item = &'a WireRecord> + Send + 'a,
        impl Iterator<Item = &'a WireRecord> + Send + 'a,
        impl Iterator<Item = &'a WireRecord> + Send + 'a,
        impl Iterator<Item = &'a WireRecord> + Send + 'a,
    >,
    request_header: &Header,
) -> ResponseInfo {
    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(id = request_header.id(), error = %e, "failed to send DNS response");
            let mut header = Header::response_from_request(request_header);
            header.set_response_code(ResponseCode::ServFail);
            header.into()
        }
    }
}

/// Convert a synthesized answer to a wire record.
///
/// Answers whose names cannot be encoded are skipped with a warning.
pub fn to_wire(answer: &Answer) -> Option<WireRecord> {
    let owner = parse_name(&answer.name)?;
    let rdata = match &answer.data {
        AnswerData::A(addr) => RData::A(A::from(*addr)),
        AnswerData::AAAA(addr) => RData::AAAA(AAAA::from(*addr)),
        AnswerData::CNAME(target) => RData::CNAME(CNAME(parse_name(target)?)),
        AnswerData::NS(server) => RData::NS(NS(parse_name(server)?)),
        AnswerData::MX { preference, exchange } => RData::MX(MX::new(*preference, parse_name(exchange)?)),
        AnswerData::SOA(soa) => RData::SOA(SOA::new(
            parse_name(&soa.mname)?,
            parse_name(&soa.rname)?,
            soa.serial,
            to_i32(soa.refresh),
            to_i32(soa.retry),
            to_i32(soa.expire),
            soa.minimum,
        )),
    };
    Some(WireRecord::from_rdata(owner, answer.ttl, rdata))
}

fn parse_name(name: &str) -> Option<Name> {
    match Name::from_utf8(name) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(name = %name, error = %e, "skipping record with invalid domain name");
            None
        }
    }
}

/// SOA timers are signed on the wire.
fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
