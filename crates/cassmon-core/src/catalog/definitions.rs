//! Compiled-in Cassandra metric definitions.
//!
//! Each group names one JMX bean (or bean pattern) and the attributes read
//! from it. Raw attribute names are mapped to output names and value kinds.
//! Groups are listed in declaration order; that order is the query order and
//! the order values are written into samples.

use super::{FieldDef, GroupDef};

const fn gauge(raw_field: &'static str, output_name: &'static str) -> FieldDef {
    FieldDef::new(raw_field, output_name, super::ValueKind::Gauge)
}

const fn rate(raw_field: &'static str, output_name: &'static str) -> FieldDef {
    FieldDef::new(raw_field, output_name, super::ValueKind::Rate)
}

const fn attribute(raw_field: &'static str, output_name: &'static str) -> FieldDef {
    FieldDef::new(raw_field, output_name, super::ValueKind::Attribute)
}

/// Reported on every sample, node-level and per-table.
pub(super) const COMMON: &[GroupDef] = &[
    GroupDef {
        resource: "org.apache.cassandra.db:type=StorageService",
        fields: &[
            attribute("ReleaseVersion", "software.version"),
            attribute("ClusterName", "cluster.name"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.db:type=EndpointSnitchInfo",
        fields: &[
            attribute("Datacenter", "cluster.datacenter"),
            attribute("Rack", "cluster.rack"),
        ],
    },
];

/// Node-level metrics (`CassandraSample`).
pub(super) const INSTANCE_LEVEL: &[GroupDef] = &[
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,name=LiveSSTableCount",
        fields: &[gauge("Value", "db.liveSSTableCount")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Client,name=connectedNativeClients",
        fields: &[gauge("Value", "client.connectedNativeClients")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=RANGE_SLICE,name=Dropped",
        fields: &[rate("Count", "db.droppedRangeSliceMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableReclaimMemory,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalMemtableReclaimMemoryCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=InternalResponseStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalInternalResponseStagePCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=Sampler,name=ActiveTasks",
        fields: &[gauge("Value", "db.threadpool.internalSamplerActiveTasks")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadRepairStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestReadRepairStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=KeyCache,name=Requests",
        fields: &[gauge("OneMinuteRate", "db.keyCacheRequestsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=READ_REPAIR,name=Dropped",
        fields: &[rate("Count", "db.droppedReadRepairMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableReclaimMemory,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtableReclaimMemoryActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=ValidationExecutor,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalValidationExecutorCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=HintsService,name=HintsFailed",
        fields: &[gauge("OneMinuteRate", "db.hintsFailedPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Storage,name=TotalHintsInProgress",
        fields: &[gauge("Count", "db.totalHintsInProgress")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CompactionExecutor,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalCompactionExecutorCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CacheCleanupExecutor,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalCacheCleanupExecutorCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=AntiEntropyStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalAntiEntropyStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=HintsDispatcher,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalHintsDispatcherPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CacheCleanupExecutor,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalCacheCleanupExecutorCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=CounterMutationStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestCounterMutationStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=RangeSlice,name=Latency",
        fields: &[
            gauge("OneMinuteRate", "query.rangeSliceRequestsPerSecond"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestReadStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=CommitLog,name=CompletedTasks",
        fields: &[rate("Value", "db.commitLogCompletedTasksPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=ViewWrite,name=Latency",
        fields: &[gauge("OneMinuteRate", "query.viewWriteRequestsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CacheCleanupExecutor,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalCacheCleanupExecutorPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtablePostFlush,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtablePostFlushPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ViewMutationStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestViewMutationStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=InternalResponseStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalInternalResponseStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=CounterMutationStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestCounterMutationStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=AntiEntropyStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalAntiEntropyStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=RowCache,name=Requests",
        fields: &[gauge("OneMinuteRate", "db.rowCacheRequestsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableFlushWriter,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtableFlushWriterPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=GossipStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalGossipStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.requestReadStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=RequestResponseStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.requestRequestResponseStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableFlushWriter,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtableFlushWriterCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=Sampler,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalSamplerCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=CounterMutationStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.requestCounterMutationStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=KeyCache,name=Size",
        fields: &[gauge("Value", "db.keyCacheSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CompactionExecutor,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalCompactionExecutorCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=GossipStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalGossipStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=SecondaryIndexManagement,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalSecondaryIndexManagementActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=RowCache,name=OneMinuteHitRate",
        fields: &[gauge("Value", "db.rowCacheHitRate")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=KeyCache,name=Hits",
        fields: &[gauge("OneMinuteRate", "db.keyCacheHitsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=HintsService,name=HintsSucceeded",
        fields: &[gauge("OneMinuteRate", "db.hintsSucceededPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,name=AllMemtablesOffHeapSize",
        fields: &[gauge("Value", "db.allMemtablesOffHeapSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=HINT,name=Dropped",
        fields: &[rate("Count", "db.droppedHintMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=COUNTER_MUTATION,name=Dropped",
        fields: &[
            rate("Count", "db.droppedCounterMutationMessagesPerSecond"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=HintsDispatcher,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalHintsDispatcherCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=Read,name=Latency",
        fields: &[
            gauge("OneMinuteRate", "query.readRequestsPerSecond"),
            gauge("98thPercentile", "query.readLatency98thPercentileMilliseconds"),
            gauge("50thPercentile", "query.readLatency50thPercentileMilliseconds"),
            gauge("999thPercentile", "query.readLatency999thPercentileMilliseconds"),
            gauge("99thPercentile", "query.readLatency99thPercentileMilliseconds"),
            gauge("75thPercentile", "query.readLatency75thPercentileMilliseconds"),
            gauge("95thPercentile", "query.readLatency95thPercentileMilliseconds"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,name=AllMemtablesHeapSize",
        fields: &[gauge("Value", "db.allMemtablesOnHeapSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MiscStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMiscStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=ValidationExecutor,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalValidationExecutorCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=READ,name=Dropped",
        fields: &[rate("Count", "db.droppedReadMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=RowCache,name=Capacity",
        fields: &[gauge("Value", "db.rowCacheCapacityBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=Write,name=Unavailables",
        fields: &[gauge("OneMinuteRate", "query.writeUnavailablesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=SecondaryIndexManagement,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalSecondaryIndexManagementPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableFlushWriter,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalMemtableFlushWriterCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=AntiEntropyStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalAntiEntropyStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=ValidationExecutor,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalValidationExecutorPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=HintsDispatcher,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalHintsDispatcherActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CacheCleanupExecutor,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalCacheCleanupExecutorActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=Read,name=Timeouts",
        fields: &[gauge("OneMinuteRate", "query.readTimeoutsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestReadStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=REQUEST_RESPONSE,name=Dropped",
        fields: &[
            rate("Count", "db.droppedRequestResponseMessagesPerSecond"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableReclaimMemory,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtableReclaimMemoryPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=Write,name=Timeouts",
        fields: &[rate("OneMinuteRate", "query.writeTimeoutsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CompactionExecutor,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalCompactionExecutorActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=MutationStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestMutationStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=RangeSlice,name=Unavailables",
        fields: &[
            gauge("OneMinuteRate", "query.rangeSliceUnavailablesPerSecond"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=MutationStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestMutationStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=Read,name=Unavailables",
        fields: &[gauge("OneMinuteRate", "query.readUnavailablesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ViewMutationStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestViewMutationStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=SecondaryIndexManagement,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalSecondaryIndexManagementCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=PendingRangeCalculator,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalPendingRangeCalculatorPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MiscStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMiscStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MiscStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMiscStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtablePostFlush,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtablePostFlushCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableReclaimMemory,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtableReclaimMemoryCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=BATCH_REMOVE,name=Dropped",
        fields: &[rate("Count", "db.droppedBatchRemoveMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=CASRead,name=Latency",
        fields: &[gauge("OneMinuteRate", "query.CASReadRequestsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=InternalResponseStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalInternalResponseStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=RowCache,name=Size",
        fields: &[gauge("Value", "db.rowCacheSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ViewMutationStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.requestViewMutationStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=SecondaryIndexManagement,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalSecondaryIndexManagementCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=Sampler,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalSamplerCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MigrationStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMigrationStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=PendingRangeCalculator,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalPendingRangeCalculatorCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=GossipStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalGossipStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=ValidationExecutor,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalValidationExecutorActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadRepairStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.requestReadRepairStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=AntiEntropyStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalAntiEntropyStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=KeyCache,name=OneMinuteHitRate",
        fields: &[gauge("Value", "db.keyCacheHitRate")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadRepairStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestReadRepairStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=CASWrite,name=Latency",
        fields: &[gauge("OneMinuteRate", "query.CASWriteRequestsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=RequestResponseStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestRequestResponseStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MigrationStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMigrationStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=RequestResponseStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestRequestResponseStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtablePostFlush,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalMemtablePostFlushCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=RowCache,name=Hits",
        fields: &[gauge("OneMinuteRate", "db.rowCacheHitsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=PAGED_RANGE,name=Dropped",
        fields: &[rate("Count", "db.droppedPagedRangeMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=HintsService,name=HintsTimedOut",
        fields: &[gauge("OneMinuteRate", "db.hintsTimedOutPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=CommitLog,name=PendingTasks",
        fields: &[gauge("Value", "db.commitLogPendindTasks")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=CompactionExecutor,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalCompactionExecutorPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadRepairStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestReadRepairStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=MUTATION,name=Dropped",
        fields: &[rate("Count", "db.droppedMutationMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=CounterMutationStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestCounterMutationStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ReadStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestReadStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=ViewMutationStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestViewMutationStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Storage,name=Exceptions",
        fields: &[gauge("Count", "storage.exceptionCount")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=PendingRangeCalculator,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalPendingRangeCalculatorCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=HintedHandOffManager,name=*",
        fields: &[gauge("Count", "db.hintedHandoffManager")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtableFlushWriter,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtableFlushWriterActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=RequestResponseStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestRequestResponseStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MigrationStage,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMigrationStagePendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=InternalResponseStage,name=CompletedTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalInternalResponseStageCompletedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=RangeSlice,name=Timeouts",
        fields: &[
            gauge("OneMinuteRate", "query.rangeSliceTimeoutsPerSecond"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=MutationStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.requestMutationStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=BATCH_STORE,name=Dropped",
        fields: &[rate("Count", "db.droppedBatchStoreMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=HintsDispatcher,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalHintsDispatcherCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=GossipStage,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalGossipStageActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Storage,name=TotalHints",
        fields: &[rate("Count", "db.totalHintsPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Storage,name=Load",
        fields: &[gauge("Count", "db.loadBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ClientRequest,scope=Write,name=Latency",
        fields: &[
            gauge("999thPercentile", "query.writeLatency999thPercentileMilliseconds"),
            gauge("75thPercentile", "query.writeLatency75thPercentileMilliseconds"),
            gauge("95thPercentile", "query.writeLatency95thPercentileMilliseconds"),
            gauge("98thPercentile", "query.writeLatency98thPercentileMilliseconds"),
            gauge("50thPercentile", "query.writeLatency50thPercentileMilliseconds"),
            gauge("99thPercentile", "query.writeLatency99thPercentileMilliseconds"),
            gauge("OneMinuteRate", "query.writeRequestsPerSecond"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=Sampler,name=PendingTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalSamplerPendingTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=PendingRangeCalculator,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalPendingRangeCalculatorActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=CommitLog,name=TotalCommitLogSize",
        fields: &[gauge("Value", "db.commitLogTotalSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=request,scope=MutationStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.requestMutationStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=DroppedMessage,scope=_TRACE,name=Dropped",
        fields: &[rate("Count", "db.droppedTraceMessagesPerSecond")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MemtablePostFlush,name=ActiveTasks",
        fields: &[
            gauge("Value", "db.threadpool.internalMemtablePostFlushActiveTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MigrationStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalMigrationStageCurrentlyBlockedTasks"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Cache,scope=KeyCache,name=Capacity",
        fields: &[gauge("Value", "db.keyCacheCapacityBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ThreadPools,path=internal,scope=MiscStage,name=CurrentlyBlockedTasks",
        fields: &[
            gauge("Count", "db.threadpool.internalMiscStageCurrentlyBlockedTasks"),
        ],
    },
];

/// Per-table metrics (`CassandraColumnFamilySample`). Every resource carries
/// `keyspace=*,scope=*` wildcards resolved at collection time.
pub(super) const SUB_RESOURCE_LEVEL: &[GroupDef] = &[
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=LiveSSTableCount",
        fields: &[gauge("Value", "db.liveSSTableCount")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=SSTablesPerReadHistogram",
        fields: &[
            gauge("75thPercentile", "db.SSTablesPerRead75thPercentileMilliseconds"),
            gauge("999thPercentile", "db.SSTablesPerRead999thPercentileMilliseconds"),
            gauge("50thPercentile", "db.SSTablesPerRead50thPercentileMilliseconds"),
            gauge("95thPercentile", "db.SSTablesPerRead95thPercentileMilliseconds"),
            gauge("98thPercentile", "db.SSTablesPerRead98thPercentileMilliseconds"),
            gauge("99thPercentile", "db.SSTablesPerRead99thPercentileMilliseconds"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=LiveDiskSpaceUsed",
        fields: &[gauge("Count", "db.liveDiskSpaceUsedBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=ReadLatency",
        fields: &[
            gauge("999thPercentile", "query.readLatency999thPercentileMilliseconds"),
            gauge("50thPercentile", "query.readLatency50thPercentileMilliseconds"),
            gauge("95thPercentile", "query.readLatency95thPercentileMilliseconds"),
            gauge("99thPercentile", "query.readLatency99thPercentileMilliseconds"),
            gauge("OneMinuteRate", "query.readRequestsPerSecond"),
            gauge("75thPercentile", "query.readLatency75thPercentileMilliseconds"),
            gauge("98thPercentile", "query.readLatency98thPercentileMilliseconds"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=WriteLatency",
        fields: &[
            gauge("999thPercentile", "query.writeLatency999thPercentileMilliseconds"),
            gauge("98thPercentile", "query.writeLatency98thPercentileMilliseconds"),
            gauge("95thPercentile", "query.writeLatency95thPercentileMilliseconds"),
            gauge("OneMinuteRate", "query.writeRequestsPerSecond"),
            gauge("75thPercentile", "query.writeLatency75thPercentileMilliseconds"),
            gauge("99thPercentile", "query.writeLatency99thPercentileMilliseconds"),
            gauge("50thPercentile", "query.writeLatency50thPercentileMilliseconds"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=PendingCompactions",
        fields: &[gauge("Value", "db.pendingCompactions")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=AllMemtablesHeapSize",
        fields: &[gauge("Value", "db.allMemtablesOnHeapSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=AllMemtablesOffHeapSize",
        fields: &[gauge("Value", "db.allMemtablesOffHeapSizeBytes")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=TombstoneScannedHistogram",
        fields: &[
            gauge("75thPercentile", "db.tombstoneScannedHistogram75thPercentile"),
            gauge("Count", "db.tombstoneScannedHistogramCount"),
            gauge("95thPercentile", "db.tombstoneScannedHistogram95thPercentile"),
            gauge("999thPercentile", "db.tombstoneScannedHistogram999thPercentile"),
            gauge("99thPercentile", "db.tombstoneScannedHistogram99thPercentile"),
            gauge("50thPercentile", "db.tombstoneScannedHistogram50thPercentile"),
            gauge("98thPercentile", "db.tombstoneScannedHistogram98thPercentile"),
        ],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=SpeculativeRetries",
        fields: &[gauge("Count", "db.speculativeRetries")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=BloomFilterFalseRatio",
        fields: &[gauge("Value", "db.bloomFilterFalseRatio")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=Table,keyspace=*,scope=*,name=MemtableLiveDataSize",
        fields: &[gauge("Value", "db.memtableLiveDataSize")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ColumnFamily,keyspace=*,scope=*,name=MeanRowSize",
        fields: &[gauge("Value", "db.meanRowSize")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ColumnFamily,keyspace=*,scope=*,name=MaxRowSize",
        fields: &[gauge("Value", "db.maxRowSize")],
    },
    GroupDef {
        resource: "org.apache.cassandra.metrics:type=ColumnFamily,keyspace=*,scope=*,name=MinRowSize",
        fields: &[gauge("Value", "db.minRowSize")],
    },
];
